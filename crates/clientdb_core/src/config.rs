//! Environment-driven configuration for callers that own the connection.
//!
//! Variables (optionally from a `.env` file):
//! - `CLIENTDB_DB_PATH` (required): SQLite file path.
//! - `CLIENTDB_LOG_LEVEL`: defaults to [`default_log_level`].
//! - `CLIENTDB_LOG_DIR`: absolute directory; logging stays off when unset.
//!
//! The repository never reads this; it only receives a connection.

use crate::db::{open_db, DbResult};
use crate::logging::{default_log_level, init_logging, LoggingError};
use rusqlite::Connection;
use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

const ENV_PREFIX: &str = "CLIENTDB_";

#[derive(Debug)]
pub struct ConfigError(envy::Error);

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid {ENV_PREFIX}* configuration: {}", self.0)
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.0)
    }
}

/// Caller-side settings for opening the client store.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CoreConfig {
    pub db_path: PathBuf,
    #[serde(default = "default_level_string")]
    pub log_level: String,
    #[serde(default)]
    pub log_dir: Option<PathBuf>,
}

fn default_level_string() -> String {
    default_log_level().to_string()
}

impl CoreConfig {
    /// Loads `.env` if present, then reads `CLIENTDB_*` variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_vars(std::env::vars())
    }

    /// Reads configuration from explicit `(key, value)` pairs.
    pub fn from_vars<I>(vars: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        envy::prefixed(ENV_PREFIX)
            .from_iter(vars)
            .map_err(ConfigError)
    }

    /// Opens and migrates the configured database file.
    pub fn open_db(&self) -> DbResult<Connection> {
        open_db(&self.db_path)
    }

    /// Starts logging when `log_dir` is set. Returns whether it did.
    pub fn init_logging(&self) -> Result<bool, LoggingError> {
        match &self.log_dir {
            Some(dir) => {
                let dir = dir.to_str().ok_or_else(|| {
                    LoggingError::InvalidDirectory(format!(
                        "log_dir must be valid UTF-8, got `{}`",
                        dir.display()
                    ))
                })?;
                init_logging(&self.log_level, dir)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
