use std::{
    fs,
    path::{Path, PathBuf},
};

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::{account::UserAccount, error::SnapshotError, store::LedgerStore};

pub const SNAPSHOT_SCHEMA_VERSION: u32 = 1;

#[derive(Serialize, Deserialize)]
struct SnapshotFile {
    schema_version: u32,
    saved_at: DateTime<Utc>,
    accounts: Vec<UserAccount>,
}

#[derive(Clone, Debug)]
pub struct SnapshotStats {
    pub path: PathBuf,
    pub loaded: bool,
    pub accounts: usize,
    /// Accounts whose balance fields disagree with each other.
    pub inconsistent: usize,
}

/// Whole-ledger json snapshot. Writes go through a temp file and a rename.
pub struct SnapshotStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl SnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<(Vec<UserAccount>, SnapshotStats), SnapshotError> {
        let _guard = self.lock.lock();
        if !self.path.exists() {
            return Ok((
                Vec::new(),
                SnapshotStats {
                    path: self.path.clone(),
                    loaded: false,
                    accounts: 0,
                    inconsistent: 0,
                },
            ));
        }
        let bytes = fs::read(&self.path)?;
        let accounts = if bytes.is_empty() {
            Vec::new()
        } else {
            let file = serde_json::from_slice::<SnapshotFile>(&bytes)?;
            if file.schema_version != SNAPSHOT_SCHEMA_VERSION {
                return Err(SnapshotError::UnsupportedVersion {
                    found: file.schema_version,
                    expected: SNAPSHOT_SCHEMA_VERSION,
                });
            }
            file.accounts
        };
        let inconsistent = accounts
            .iter()
            .filter(|account| !account.points().is_consistent())
            .count();
        let stats = SnapshotStats {
            path: self.path.clone(),
            loaded: true,
            accounts: accounts.len(),
            inconsistent,
        };
        Ok((accounts, stats))
    }

    /// Capture and write the store. The capture happens under the write lock so the
    /// last writer always persists every mutation committed before it.
    pub fn persist(&self, store: &LedgerStore) -> Result<usize, SnapshotError> {
        let _guard = self.lock.lock();
        let file = SnapshotFile {
            schema_version: SNAPSHOT_SCHEMA_VERSION,
            saved_at: Utc::now(),
            accounts: store.snapshot(),
        };
        let count = file.accounts.len();
        let bytes = serde_json::to_vec_pretty(&file)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, bytes)?;
        fs::rename(&tmp, &self.path)?;
        Ok(count)
    }
}
