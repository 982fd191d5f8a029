use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while loading or validating configuration.
///
/// Every variant is fatal: the process must stop before any connection is
/// attempted.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A required setting is absent. Holds the environment variable name.
    #[error("missing required setting: {0}")]
    Missing(String),

    /// A setting is present but unusable.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Connection settings for the PostgreSQL store.
///
/// Field names match the `DB_` environment variables with the prefix
/// stripped (`DB_HOST` -> `host`, `DB_PASS` -> `pass`, ...).
#[derive(Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub host: String,
    /// Database name.
    pub name: String,
    pub user: String,
    #[serde(rename = "pass")]
    pub password: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Optional schema placed first on the connection's `search_path`.
    #[serde(default)]
    pub schema: Option<String>,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_acquire_timeout_secs")]
    pub acquire_timeout_secs: u64,
}

/// Sizing policy for the connection pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolSettings {
    pub min_connections: u32,
    pub max_connections: u32,
    pub acquire_timeout: Duration,
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            min_connections: default_min_connections(),
            max_connections: default_max_connections(),
            acquire_timeout: Duration::from_secs(default_acquire_timeout_secs()),
        }
    }
}

fn default_port() -> u16 {
    5432
}

fn default_min_connections() -> u32 {
    1
}

fn default_max_connections() -> u32 {
    32
}

fn default_acquire_timeout_secs() -> u64 {
    30
}

impl DatabaseConfig {
    /// Checks the loaded values for blanks and inconsistent pool bounds.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Missing` for a blank required setting and
    /// `ConfigError::Invalid` for unusable pool bounds.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let required = [
            ("DB_HOST", &self.host),
            ("DB_NAME", &self.name),
            ("DB_USER", &self.user),
            ("DB_PASS", &self.password),
        ];
        for (var, value) in required {
            if value.trim().is_empty() {
                return Err(ConfigError::Missing(var.to_string()));
            }
        }

        if self.max_connections == 0 {
            return Err(ConfigError::Invalid(
                "DB_MAX_CONNECTIONS must be at least 1".to_string(),
            ));
        }
        if self.min_connections > self.max_connections {
            return Err(ConfigError::Invalid(format!(
                "DB_MIN_CONNECTIONS ({}) exceeds DB_MAX_CONNECTIONS ({})",
                self.min_connections, self.max_connections
            )));
        }

        Ok(())
    }

    #[must_use]
    pub fn pool_settings(&self) -> PoolSettings {
        PoolSettings {
            min_connections: self.min_connections,
            max_connections: self.max_connections,
            acquire_timeout: Duration::from_secs(self.acquire_timeout_secs),
        }
    }

    /// `user@host:port/name`, safe to log.
    #[must_use]
    pub fn display_target(&self) -> String {
        format!("{}@{}:{}/{}", self.user, self.host, self.port, self.name)
    }
}

// Hand-written so the password never reaches a log line.
impl std::fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("host", &self.host)
            .field("name", &self.name)
            .field("user", &self.user)
            .field("password", &"***")
            .field("port", &self.port)
            .field("schema", &self.schema)
            .field("min_connections", &self.min_connections)
            .field("max_connections", &self.max_connections)
            .field("acquire_timeout_secs", &self.acquire_timeout_secs)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> DatabaseConfig {
        DatabaseConfig {
            host: "localhost".to_string(),
            name: "nbb".to_string(),
            user: "scraper".to_string(),
            password: "secret".to_string(),
            port: 5432,
            schema: None,
            min_connections: 1,
            max_connections: 32,
            acquire_timeout_secs: 30,
        }
    }

    #[test]
    fn test_valid_config_passes() {
        assert!(sample().validate().is_ok());
    }

    #[test]
    fn test_blank_host_is_missing() {
        let mut config = sample();
        config.host = "  ".to_string();

        match config.validate() {
            Err(ConfigError::Missing(var)) => assert_eq!(var, "DB_HOST"),
            other => panic!("expected missing DB_HOST, got {other:?}"),
        }
    }

    #[test]
    fn test_min_above_max_is_invalid() {
        let mut config = sample();
        config.min_connections = 40;

        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_zero_max_connections_is_invalid() {
        let mut config = sample();
        config.min_connections = 0;
        config.max_connections = 0;

        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_pool_settings_from_config() {
        let settings = sample().pool_settings();
        assert_eq!(settings, PoolSettings::default());
    }

    #[test]
    fn test_debug_hides_password() {
        let rendered = format!("{:?}", sample());
        assert!(!rendered.contains("secret"));
        assert!(rendered.contains("scraper"));
    }

    #[test]
    fn test_display_target() {
        assert_eq!(sample().display_target(), "scraper@localhost:5432/nbb");
    }
}
