use std::{collections::HashMap, sync::Arc};

use chrono::Utc;
use core_types::types::UserId;
use parking_lot::{Mutex, RwLock};

use crate::{account::UserAccount, error::Result};

/// In-memory account table. Each user has a single-writer slot: every mutation holds
/// that user's lock for its whole validate-then-write sequence.
pub struct LedgerStore {
    accounts: RwLock<HashMap<UserId, Arc<Mutex<UserAccount>>>>,
}

impl LedgerStore {
    pub fn new() -> Self {
        Self {
            accounts: RwLock::new(HashMap::new()),
        }
    }

    pub fn from_accounts(accounts: impl IntoIterator<Item = UserAccount>) -> Self {
        let accounts = accounts
            .into_iter()
            .map(|account| {
                (
                    account.user_id().to_string(),
                    Arc::new(Mutex::new(account)),
                )
            })
            .collect();
        Self {
            accounts: RwLock::new(accounts),
        }
    }

    fn existing(&self, user_id: &str) -> Option<Arc<Mutex<UserAccount>>> {
        self.accounts.read().get(user_id).cloned()
    }

    fn ensure_account(&self, user_id: &str) -> Arc<Mutex<UserAccount>> {
        if let Some(account) = self.existing(user_id) {
            return account;
        }
        let mut guard = self.accounts.write();
        guard
            .entry(user_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(UserAccount::new(user_id, Utc::now()))))
            .clone()
    }

    /// Run `mutator` against the user's account, creating a zero account on first use.
    pub fn mutate<F, T>(&self, user_id: &str, mutator: F) -> Result<T>
    where
        F: FnOnce(&mut UserAccount) -> Result<T>,
    {
        let account = self.ensure_account(user_id);
        let mut guard = account.lock();
        mutator(&mut *guard)
    }

    /// Read the user's account. Unknown users see a transient zero account and are not
    /// inserted.
    pub fn read<F, T>(&self, user_id: &str, reader: F) -> T
    where
        F: FnOnce(&UserAccount) -> T,
    {
        match self.existing(user_id) {
            Some(account) => reader(&*account.lock()),
            None => reader(&UserAccount::new(user_id, Utc::now())),
        }
    }

    pub fn contains(&self, user_id: &str) -> bool {
        self.accounts.read().contains_key(user_id)
    }

    pub fn len(&self) -> usize {
        self.accounts.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.read().is_empty()
    }

    /// Clone every account, each under its own lock, ordered by user id.
    pub fn snapshot(&self) -> Vec<UserAccount> {
        let handles: Vec<_> = self.accounts.read().values().cloned().collect();
        let mut accounts: Vec<UserAccount> =
            handles.iter().map(|handle| handle.lock().clone()).collect();
        accounts.sort_by(|a, b| a.user_id().cmp(b.user_id()));
        accounts
    }
}

impl Default for LedgerStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{catalog::Catalog, error::PointsError};

    #[test]
    fn reads_do_not_create_accounts() {
        let store = LedgerStore::new();
        let balance = store.read("ghost", |a| a.points().clone());
        assert_eq!(balance.available_points, 0);
        assert!(!store.contains("ghost"));
    }

    #[test]
    fn failed_mutation_still_registers_user_with_zero_balance() {
        let store = LedgerStore::new();
        let catalog = Catalog::seeded();
        let offer = catalog.offer("gkash_starter").unwrap();
        let err = store
            .mutate("dave", |a| a.purchase_stock(offer, Utc::now()))
            .unwrap_err();
        assert!(matches!(err, PointsError::InsufficientBalance { .. }));
        assert!(store.contains("dave"));
        assert_eq!(store.read("dave", |a| a.points().available_points), 0);
    }

    #[test]
    fn snapshot_is_sorted_by_user() {
        let store = LedgerStore::new();
        let catalog = Catalog::seeded();
        let reward = catalog.reward("module_budgeting_101").unwrap();
        for user in ["zed", "amy", "max"] {
            store
                .mutate(user, |a| a.complete_module(reward, 1.0, Utc::now()))
                .unwrap();
        }
        let users: Vec<_> = store
            .snapshot()
            .iter()
            .map(|a| a.user_id().to_string())
            .collect();
        assert_eq!(users, vec!["amy", "max", "zed"]);
    }
}
