//! Application configuration module.
//!
//! Configuration is loaded from environment variables with fallback to defaults.
//!
//! ## Environment Variables
//! | Variable                       | Default       |
//! |--------------------------------|---------------|
//! | `LICITA_DATABASE_PATH`         | `./licita.db` |
//! | `LICITA_DB_MAX_CONNECTIONS`    | `5`           |
//! | `LICITA_DEFAULT_VALIDITY_DAYS` | `180`         |
//!
//! The default validity must lie in `1..=3650` days.

use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

use licita_core::{DEFAULT_DOCUMENT_VALIDITY_DAYS, MAX_DOCUMENT_VALIDITY_DAYS};

use crate::pool::DbConfig;

const DATABASE_PATH_VAR: &str = "LICITA_DATABASE_PATH";
const MAX_CONNECTIONS_VAR: &str = "LICITA_DB_MAX_CONNECTIONS";
const VALIDITY_DAYS_VAR: &str = "LICITA_DEFAULT_VALIDITY_DAYS";

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// SQLite database file
    pub database_path: PathBuf,

    /// Upper bound of the connection pool
    pub max_connections: u32,

    /// Validity applied to uploads without an expiration date
    pub default_validity_days: i64,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            database_path: PathBuf::from("./licita.db"),
            max_connections: 5,
            default_validity_days: DEFAULT_DOCUMENT_VALIDITY_DAYS,
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| env::var(var).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = AppConfig::default();

        let config = AppConfig {
            database_path: lookup(DATABASE_PATH_VAR)
                .filter(|path| !path.trim().is_empty())
                .map(PathBuf::from)
                .unwrap_or(defaults.database_path),

            max_connections: match lookup(MAX_CONNECTIONS_VAR) {
                Some(raw) => raw
                    .trim()
                    .parse()
                    .map_err(|_| ConfigError::InvalidValue(MAX_CONNECTIONS_VAR.to_string()))?,
                None => defaults.max_connections,
            },

            default_validity_days: match lookup(VALIDITY_DAYS_VAR) {
                Some(raw) => raw
                    .trim()
                    .parse()
                    .map_err(|_| ConfigError::InvalidValue(VALIDITY_DAYS_VAR.to_string()))?,
                None => defaults.default_validity_days,
            },
        };

        if config.max_connections == 0 {
            return Err(ConfigError::InvalidValue(MAX_CONNECTIONS_VAR.to_string()));
        }
        if !(1..=MAX_DOCUMENT_VALIDITY_DAYS).contains(&config.default_validity_days) {
            return Err(ConfigError::InvalidValue(VALIDITY_DAYS_VAR.to_string()));
        }

        Ok(config)
    }

    /// Pool configuration derived from these settings.
    pub fn db_config(&self) -> DbConfig {
        DbConfig::new(&self.database_path).max_connections(self.max_connections)
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),
}
