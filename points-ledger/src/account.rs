use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use core_types::{
    types::{ModuleId, Points, PointsTransactionType, UserId},
    uid::{format_uid, purchase_uid, transaction_uid},
};
use serde::{Deserialize, Serialize};

use crate::{
    catalog::{GKashStockOffer, LearningReward},
    error::{PointsError, Result},
    model::{LearningProgress, PointsTransaction, StockPurchase, UserPoints},
};

/// Everything the ledger knows about one user. Mutations validate first and only then
/// touch state, so a failed call leaves the account unchanged.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserAccount {
    points: UserPoints,
    progress: BTreeMap<ModuleId, LearningProgress>,
    purchases: Vec<StockPurchase>,
    transactions: Vec<PointsTransaction>,
    sequence: u64,
}

impl UserAccount {
    pub fn new(user_id: impl Into<UserId>, now: DateTime<Utc>) -> Self {
        Self {
            points: UserPoints::zero(user_id, now),
            progress: BTreeMap::new(),
            purchases: Vec::new(),
            transactions: Vec::new(),
            sequence: 0,
        }
    }

    pub fn user_id(&self) -> &str {
        &self.points.user_id
    }

    pub fn points(&self) -> &UserPoints {
        &self.points
    }

    pub fn is_completed(&self, module_id: &str) -> bool {
        self.progress
            .get(module_id)
            .map(|p| p.completed)
            .unwrap_or(false)
    }

    pub fn progress(&self) -> impl Iterator<Item = &LearningProgress> {
        self.progress.values()
    }

    /// Receipts, newest first.
    pub fn purchases(&self) -> impl Iterator<Item = &StockPurchase> {
        self.purchases.iter().rev()
    }

    /// Transactions, newest first.
    pub fn history(&self) -> impl Iterator<Item = &PointsTransaction> {
        self.transactions.iter().rev()
    }

    pub fn transaction_count(&self) -> usize {
        self.transactions.len()
    }

    pub fn complete_module(
        &mut self,
        reward: &LearningReward,
        completion_score: f64,
        now: DateTime<Utc>,
    ) -> Result<PointsTransaction> {
        if self.is_completed(&reward.module_id) {
            return Err(PointsError::AlreadyCompleted {
                user_id: self.points.user_id.clone(),
                module_id: reward.module_id.clone(),
            });
        }
        let awarded = reward.award_for(completion_score);

        self.points.total_points += awarded;
        self.points.available_points += awarded;
        self.points.lifetime_earned += awarded;
        self.points.last_updated = now;

        self.progress.insert(
            reward.module_id.clone(),
            LearningProgress {
                user_id: self.points.user_id.clone(),
                module_id: reward.module_id.clone(),
                completed: true,
                completed_at: Some(now),
                points_earned: awarded,
                progress_percentage: 100,
            },
        );

        let txn = self.append(
            PointsTransactionType::EarnedLearning,
            awarded,
            format!("Completed {}", reward.module_name),
            Some(reward.module_id.clone()),
            now,
        );
        Ok(txn)
    }

    pub fn purchase_stock(
        &mut self,
        offer: &GKashStockOffer,
        now: DateTime<Utc>,
    ) -> Result<(StockPurchase, PointsTransaction)> {
        if self.points.available_points < offer.points_cost {
            return Err(PointsError::InsufficientBalance {
                required: offer.points_cost,
                available: self.points.available_points,
            });
        }

        self.points.available_points -= offer.points_cost;
        self.points.lifetime_spent += offer.points_cost;
        self.points.last_updated = now;

        self.sequence += 1;
        let purchase = StockPurchase {
            id: format_uid(
                "buy",
                &purchase_uid(
                    &self.points.user_id,
                    &offer.id,
                    self.sequence,
                    timestamp_ns(now),
                ),
            ),
            user_id: self.points.user_id.clone(),
            stock_offer_id: offer.id.clone(),
            shares_amount: offer.shares_amount,
            points_spent: offer.points_cost,
            stock_value_at_purchase: offer.stock_value,
            purchased_at: now,
        };
        self.purchases.push(purchase.clone());

        let txn = self.append(
            PointsTransactionType::SpentStock,
            -offer.points_cost,
            format!("Purchased {}", offer.name),
            Some(offer.id.clone()),
            now,
        );
        Ok((purchase, txn))
    }

    /// Rebuild `(earned, spent)` from the transaction log alone.
    pub fn replay(&self) -> (Points, Points) {
        self.transactions
            .iter()
            .fold((0, 0), |(earned, spent), txn| {
                if txn.transaction_type.is_credit() {
                    (earned + txn.amount, spent)
                } else {
                    (earned, spent - txn.amount)
                }
            })
    }

    fn append(
        &mut self,
        transaction_type: PointsTransactionType,
        amount: Points,
        description: String,
        related_item_id: Option<String>,
        now: DateTime<Utc>,
    ) -> PointsTransaction {
        self.sequence += 1;
        let txn = PointsTransaction {
            id: format_uid(
                "txn",
                &transaction_uid(&self.points.user_id, self.sequence, timestamp_ns(now)),
            ),
            user_id: self.points.user_id.clone(),
            transaction_type,
            amount,
            description,
            related_item_id,
            timestamp: now,
        };
        self.transactions.push(txn.clone());
        txn
    }
}

fn timestamp_ns(ts: DateTime<Utc>) -> i64 {
    ts.timestamp_nanos_opt()
        .unwrap_or_else(|| ts.timestamp_micros() * 1_000)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;

    #[test]
    fn award_then_spend_keeps_invariant() {
        let catalog = Catalog::seeded();
        let now = Utc::now();
        let mut account = UserAccount::new("alice", now);

        account
            .complete_module(catalog.reward("module_stock_market").unwrap(), 1.0, now)
            .unwrap();
        assert_eq!(account.points().available_points, 240);

        account
            .purchase_stock(catalog.offer("gkash_starter").unwrap(), now)
            .unwrap();
        let points = account.points();
        assert_eq!(points.available_points, 140);
        assert_eq!(points.lifetime_spent, 100);
        assert_eq!(points.total_points, 240);
        assert!(points.is_consistent());
        assert_eq!(account.replay(), (240, 100));
    }

    #[test]
    fn failed_purchase_leaves_account_untouched() {
        let catalog = Catalog::seeded();
        let now = Utc::now();
        let mut account = UserAccount::new("bob", now);
        let before = account.points().clone();

        let err = account
            .purchase_stock(catalog.offer("gkash_basic").unwrap(), now)
            .unwrap_err();
        assert!(matches!(
            err,
            PointsError::InsufficientBalance {
                required: 250,
                available: 0
            }
        ));
        assert_eq!(account.points(), &before);
        assert_eq!(account.transaction_count(), 0);
        assert_eq!(account.purchases().count(), 0);
    }

    #[test]
    fn transaction_ids_are_unique_within_a_timestamp() {
        let catalog = Catalog::seeded();
        let now = Utc::now();
        let mut account = UserAccount::new("carol", now);
        let a = account
            .complete_module(catalog.reward("module_budgeting_101").unwrap(), 1.0, now)
            .unwrap();
        let b = account
            .complete_module(catalog.reward("module_saving_basics").unwrap(), 1.0, now)
            .unwrap();
        assert_ne!(a.id, b.id);
        assert!(a.id.starts_with("txn_"));
    }
}
