//! Pool configuration with TOML file support.

use bribe_types::{AccountId, PoolParams};
use bribe_utils::LogFormat;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::PoolError;

/// Configuration for one pool instance.
///
/// Can be loaded from a TOML file via [`PoolConfig::from_toml_file`] or
/// built programmatically (e.g. for tests).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolConfig {
    /// Display name of the pool share.
    #[serde(default = "default_name")]
    pub name: String,

    /// Ticker of the pool share.
    #[serde(default = "default_symbol")]
    pub symbol: String,

    /// Identity that holds custody in both asset ledgers and votes in the
    /// governance registry.
    #[serde(default = "default_pool_account")]
    pub pool_account: AccountId,

    #[serde(default)]
    pub log_format: LogFormat,

    /// Tracing filter used when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub params: PoolParams,
}

fn default_name() -> String {
    "Bribe Pool".to_string()
}

fn default_symbol() -> String {
    "BRIBE".to_string()
}

fn default_pool_account() -> AccountId {
    AccountId::new("bribe-pool")
}

fn default_log_level() -> String {
    "info".to_string()
}

impl PoolConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, PoolError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| PoolError::Config(e.to_string()))?;
        Self::from_toml_str(&content)
    }

    /// Parse and validate configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, PoolError> {
        let config: Self = toml::from_str(s).map_err(|e| PoolError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String, PoolError> {
        toml::to_string_pretty(self).map_err(|e| PoolError::Config(e.to_string()))
    }

    pub fn validate(&self) -> Result<(), PoolError> {
        if self.name.trim().is_empty() || self.symbol.trim().is_empty() {
            return Err(PoolError::Config("name and symbol must be non-empty".into()));
        }
        self.params
            .validate()
            .map_err(|e| PoolError::Config(e.to_string()))
    }
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            symbol: default_symbol(),
            pool_account: default_pool_account(),
            log_format: LogFormat::default(),
            log_level: default_log_level(),
            params: PoolParams::default(),
        }
    }
}
