use std::path::{Path, PathBuf};

pub use config::ConfigError;

use config::Config;
use serde::{Deserialize, Serialize};

use crate::types::Points;

pub const DEFAULT_CONFIG_FILE: &str = "config.toml";
pub const ENV_PREFIX: &str = "GKASH";

/// Layered configuration: optional `config.toml`, then `GKASH__SECTION__KEY` env vars.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub ledger: LedgerSettings,
    #[serde(default)]
    pub service: ServiceSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerSettings {
    /// Directory holding the ledger snapshot. `None` keeps the ledger in memory only; the
    /// `gkash` binary maps unset to a per-environment default and `""` to in-memory.
    #[serde(default)]
    pub state_dir: Option<PathBuf>,
    #[serde(default = "default_achievement_threshold")]
    pub achievement_threshold: Points,
}

impl Default for LedgerSettings {
    fn default() -> Self {
        Self {
            state_dir: None,
            achievement_threshold: default_achievement_threshold(),
        }
    }
}

fn default_achievement_threshold() -> Points {
    100
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ServiceSettings {
    /// Fixed delay applied before every use-case call to mimic backend latency.
    #[serde(default)]
    pub simulated_latency_ms: u64,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(Path::new(DEFAULT_CONFIG_FILE))
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(config::File::from(path).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;
        let config: Self = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.ledger.achievement_threshold <= 0 {
            return Err(ConfigError::Message(
                "ledger.achievement_threshold must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
