use std::{path::PathBuf, str::FromStr};

use points_ledger::LedgerConfig;
use rewards_service::ServiceConfig;
use thiserror::Error;

/// Deployment target for the binary.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Environment {
    Dev,
    Prod,
}

impl FromStr for Environment {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "dev" => Ok(Environment::Dev),
            "prod" => Ok(Environment::Prod),
            other => Err(ConfigError::UnknownEnvironment {
                value: other.to_string(),
            }),
        }
    }
}

/// Settings resolved from `config.toml`, `GKASH__*` env vars, and per-environment defaults.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub env: Environment,
    pub ledger: LedgerConfig,
    pub service: ServiceConfig,
}

impl AppConfig {
    pub fn load(env: Environment) -> Result<Self, ConfigError> {
        let settings = core_types::AppConfig::load()?;
        Ok(Self::resolve(env, &settings))
    }

    fn resolve(env: Environment, settings: &core_types::AppConfig) -> Self {
        let mut ledger = LedgerConfig::from(&settings.ledger);
        // An explicit empty `state_dir` opts out of snapshots; unset falls back per env.
        ledger.state_dir = match ledger.state_dir.take() {
            Some(dir) if dir.as_os_str().is_empty() => None,
            Some(dir) => Some(dir),
            None => Some(default_state_dir(env)),
        };
        Self {
            env,
            ledger,
            service: ServiceConfig::from(&settings.service),
        }
    }

    pub fn env_label(&self) -> &'static str {
        match self.env {
            Environment::Dev => "dev",
            Environment::Prod => "prod",
        }
    }
}

fn default_state_dir(env: Environment) -> PathBuf {
    match env {
        Environment::Dev => PathBuf::from("gkash.state"),
        Environment::Prod => PathBuf::from("/var/lib/gkash"),
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unknown environment '{value}' (expected 'dev' or 'prod')")]
    UnknownEnvironment { value: String },
    #[error("configuration error: {0}")]
    Settings(#[from] core_types::config::ConfigError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_environment_case_insensitively() {
        assert_eq!("DEV".parse::<Environment>().unwrap(), Environment::Dev);
        assert_eq!("prod".parse::<Environment>().unwrap(), Environment::Prod);
        assert!("staging".parse::<Environment>().is_err());
    }

    #[test]
    fn defaults_state_dir_per_environment() {
        let settings = core_types::AppConfig::default();
        let dev = AppConfig::resolve(Environment::Dev, &settings);
        assert_eq!(dev.ledger.state_dir, Some(PathBuf::from("gkash.state")));
        assert_eq!(dev.env_label(), "dev");
        let prod = AppConfig::resolve(Environment::Prod, &settings);
        assert_eq!(prod.ledger.state_dir, Some(PathBuf::from("/var/lib/gkash")));
    }

    #[test]
    fn empty_state_dir_runs_in_memory() {
        let mut settings = core_types::AppConfig::default();
        settings.ledger.state_dir = Some(PathBuf::new());
        let resolved = AppConfig::resolve(Environment::Dev, &settings);
        assert!(resolved.ledger.state_dir.is_none());
        assert!(resolved.ledger.snapshot_path().is_none());
    }

    #[test]
    fn configured_state_dir_wins() {
        let mut settings = core_types::AppConfig::default();
        settings.ledger.state_dir = Some(PathBuf::from("/tmp/custom"));
        settings.service.simulated_latency_ms = 40;
        let resolved = AppConfig::resolve(Environment::Prod, &settings);
        assert_eq!(resolved.ledger.state_dir, Some(PathBuf::from("/tmp/custom")));
        assert_eq!(resolved.service.simulated_latency.as_millis(), 40);
    }
}
