//! CLI configuration module.
//!
//! Configuration is loaded from environment variables with fallback to defaults.
//!
//! | Variable                      | Default       |
//! |-------------------------------|---------------|
//! | `TALLY_DB_PATH`               | `./tally.db`  |
//! | `TALLY_DB_MAX_CONNECTIONS`    | `5`           |
//! | `TALLY_DB_BUSY_TIMEOUT_SECS`  | `5`           |

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use serde::Serialize;
use tally_db::DbConfig;

const DEFAULT_DB_PATH: &str = "./tally.db";
const DEFAULT_MAX_CONNECTIONS: u32 = 5;
const DEFAULT_BUSY_TIMEOUT_SECS: u64 = 5;

/// Tally CLI configuration.
#[derive(Debug, Clone, Serialize)]
pub struct TallyConfig {
    /// SQLite database file
    pub db_path: PathBuf,

    /// Pool size
    pub max_connections: u32,

    /// How long a writer waits for the database lock
    pub busy_timeout_secs: u64,
}

impl TallyConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a configuration from any key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let db_path = lookup("TALLY_DB_PATH")
            .filter(|path| !path.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DB_PATH));

        let max_connections: u32 = parse_or(&lookup, "TALLY_DB_MAX_CONNECTIONS", DEFAULT_MAX_CONNECTIONS)?;
        if max_connections == 0 {
            return Err(ConfigError::InvalidValue("TALLY_DB_MAX_CONNECTIONS".to_string()));
        }

        let busy_timeout_secs: u64 =
            parse_or(&lookup, "TALLY_DB_BUSY_TIMEOUT_SECS", DEFAULT_BUSY_TIMEOUT_SECS)?;

        Ok(TallyConfig {
            db_path,
            max_connections,
            busy_timeout_secs,
        })
    }

    /// Database settings for this configuration.
    pub fn db_config(&self) -> DbConfig {
        DbConfig::new(&self.db_path)
            .max_connections(self.max_connections)
            .busy_timeout(Duration::from_secs(self.busy_timeout_secs))
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue(key.to_string())),
        None => Ok(default),
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = TallyConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.db_path, PathBuf::from("./tally.db"));
        assert_eq!(config.max_connections, 5);
        assert_eq!(config.busy_timeout_secs, 5);
    }

    #[test]
    fn test_overrides() {
        let config = TallyConfig::from_lookup(lookup(&[
            ("TALLY_DB_PATH", "/var/lib/tally/books.db"),
            ("TALLY_DB_MAX_CONNECTIONS", "8"),
            ("TALLY_DB_BUSY_TIMEOUT_SECS", " 30 "),
        ]))
        .unwrap();

        assert_eq!(config.db_path, PathBuf::from("/var/lib/tally/books.db"));
        assert_eq!(config.max_connections, 8);

        let db = config.db_config();
        assert_eq!(db.max_connections, 8);
        assert_eq!(db.busy_timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_invalid_values() {
        let err = TallyConfig::from_lookup(lookup(&[("TALLY_DB_MAX_CONNECTIONS", "many")]))
            .unwrap_err();
        assert_eq!(err.to_string(), "Invalid value for TALLY_DB_MAX_CONNECTIONS");

        assert!(TallyConfig::from_lookup(lookup(&[("TALLY_DB_MAX_CONNECTIONS", "0")])).is_err());
        assert!(TallyConfig::from_lookup(lookup(&[("TALLY_DB_BUSY_TIMEOUT_SECS", "-1")])).is_err());
    }
}
