//! Store configuration
//!
//! Loaded from TOML (file or string) with defaults for every field:
//!
//! ```toml
//! [store]
//! database_url = "sqlite:data/tellerbank.db"
//! max_connections = 5
//! busy_timeout_ms = 5000
//! statement_timeout_ms = 10000
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Configuration loading errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// File not found
    #[error("config file not found: {0}")]
    NotFound(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// Validation error
    #[error("validation error: {0}")]
    Validation(String),
}

/// Root configuration document
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BankConfig {
    #[serde(default)]
    pub store: StoreConfig,
}

/// Persistent store settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// SQLite URL, e.g. `sqlite:data/tellerbank.db`
    #[serde(default = "default_database_url")]
    pub database_url: String,

    /// Pool size
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// How long SQLite waits on a locked database before giving up
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,

    /// Upper bound for any single business operation against the store
    #[serde(default = "default_statement_timeout_ms")]
    pub statement_timeout_ms: u64,
}

fn default_database_url() -> String {
    "sqlite:data/tellerbank.db".to_string()
}

fn default_max_connections() -> u32 {
    5
}

fn default_busy_timeout_ms() -> u64 {
    5_000
}

fn default_statement_timeout_ms() -> u64 {
    10_000
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            database_url: default_database_url(),
            max_connections: default_max_connections(),
            busy_timeout_ms: default_busy_timeout_ms(),
            statement_timeout_ms: default_statement_timeout_ms(),
        }
    }
}

impl StoreConfig {
    /// Defaults pointing at a SQLite file on disk
    pub fn for_path<P: AsRef<Path>>(path: P) -> Self {
        Self {
            database_url: format!("sqlite:{}", path.as_ref().display()),
            ..Self::default()
        }
    }

    pub fn busy_timeout(&self) -> Duration {
        Duration::from_millis(self.busy_timeout_ms)
    }

    pub fn statement_timeout(&self) -> Duration {
        Duration::from_millis(self.statement_timeout_ms)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !self.database_url.starts_with("sqlite:") {
            return Err(ConfigError::Validation(format!(
                "database_url must be a sqlite URL, got '{}'",
                self.database_url
            )));
        }
        if self.max_connections == 0 {
            return Err(ConfigError::Validation(
                "max_connections must be at least 1".to_string(),
            ));
        }
        if self.statement_timeout_ms == 0 {
            return Err(ConfigError::Validation(
                "statement_timeout_ms must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

impl BankConfig {
    /// Load configuration from file
    pub fn load_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::NotFound(path.display().to_string()));
        }

        let content = std::fs::read_to_string(path)?;
        Self::load_str(&content)
    }

    /// Load configuration from string
    pub fn load_str(content: &str) -> Result<Self, ConfigError> {
        let config: BankConfig = toml::from_str(content)?;
        config.store.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = BankConfig::load_str("").unwrap();
        assert_eq!(config.store.database_url, "sqlite:data/tellerbank.db");
        assert_eq!(config.store.max_connections, 5);
        assert_eq!(config.store.statement_timeout(), Duration::from_secs(10));
    }

    #[test]
    fn test_overrides() {
        let config = BankConfig::load_str(
            r#"
            [store]
            database_url = "sqlite:/tmp/bank.db"
            max_connections = 2
            statement_timeout_ms = 250
            "#,
        )
        .unwrap();

        assert_eq!(config.store.database_url, "sqlite:/tmp/bank.db");
        assert_eq!(config.store.max_connections, 2);
        assert_eq!(config.store.busy_timeout_ms, 5_000);
        assert_eq!(config.store.statement_timeout(), Duration::from_millis(250));
    }

    #[test]
    fn test_validation() {
        let err = BankConfig::load_str("[store]\ndatabase_url = \"postgres://x\"").unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));

        let err = BankConfig::load_str("[store]\nmax_connections = 0").unwrap_err();
        assert!(err.to_string().contains("max_connections"));
    }

    #[test]
    fn test_missing_file() {
        let err = BankConfig::load_file("/nonexistent/tellerbank.toml").unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn test_for_path() {
        let config = StoreConfig::for_path("/tmp/x/bank.db");
        assert_eq!(config.database_url, "sqlite:/tmp/x/bank.db");
    }
}
