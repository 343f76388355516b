use std::{
    fs,
    path::{Path, PathBuf},
};

use core_types::{config::LedgerSettings, types::Points};

use crate::error::SnapshotError;

pub const DEFAULT_ACHIEVEMENT_THRESHOLD: Points = 100;
pub const SNAPSHOT_FILE_NAME: &str = "points-ledger.json";

#[derive(Clone, Debug)]
pub struct LedgerConfig {
    /// `None` keeps the ledger purely in memory.
    pub state_dir: Option<PathBuf>,
    pub achievement_threshold: Points,
}

impl LedgerConfig {
    pub fn in_memory() -> Self {
        Self {
            state_dir: None,
            achievement_threshold: DEFAULT_ACHIEVEMENT_THRESHOLD,
        }
    }

    pub fn persistent(state_dir: PathBuf) -> Self {
        Self {
            state_dir: Some(state_dir),
            ..Self::in_memory()
        }
    }

    pub fn state_dir(&self) -> Option<&Path> {
        self.state_dir.as_deref()
    }

    pub fn snapshot_path(&self) -> Option<PathBuf> {
        self.state_dir.as_ref().map(|dir| dir.join(SNAPSHOT_FILE_NAME))
    }

    pub fn ensure_dirs(&self) -> Result<(), SnapshotError> {
        if let Some(dir) = &self.state_dir {
            if !dir.exists() {
                fs::create_dir_all(dir)?;
            }
        }
        Ok(())
    }
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self::in_memory()
    }
}

impl From<&LedgerSettings> for LedgerConfig {
    fn from(settings: &LedgerSettings) -> Self {
        Self {
            state_dir: settings.state_dir.clone(),
            achievement_threshold: settings.achievement_threshold,
        }
    }
}
