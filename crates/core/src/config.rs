// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Reducer configuration
//!
//! ```toml
//! log_key = "optimist"
//! unknown_transaction = "warn"
//! ```

use crate::effect::LogLevel;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default key the keyed adapter stores the log under
pub const DEFAULT_LOG_KEY: &str = "optimist";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("log_key must not be empty")]
    EmptyLogKey,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OptimistConfig {
    /// Reserved container key holding the transaction log
    pub log_key: String,
    /// Level for commit/revert of a transaction that is not open
    pub unknown_transaction: LogLevel,
}

impl Default for OptimistConfig {
    fn default() -> Self {
        Self {
            log_key: DEFAULT_LOG_KEY.to_string(),
            unknown_transaction: LogLevel::Warn,
        }
    }
}

impl OptimistConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: OptimistConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.log_key.is_empty() {
            return Err(ConfigError::EmptyLogKey);
        }
        Ok(())
    }

    pub fn with_log_key(self, log_key: impl Into<String>) -> Self {
        Self {
            log_key: log_key.into(),
            ..self
        }
    }

    pub fn with_unknown_transaction(self, level: LogLevel) -> Self {
        Self {
            unknown_transaction: level,
            ..self
        }
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
