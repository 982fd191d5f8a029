use std::path::Path;

use figment::{
    error::Kind,
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::config::{ConfigError, DatabaseConfig};

/// Default location of the optional settings file.
pub const DEFAULT_CONFIG_PATH: &str = "config/Store.toml";

/// Text settings taken from the environment exactly as written. The parsed
/// `Env` provider would turn `007` into `7` or `[abc]` into an array.
const RAW_SETTINGS: [&str; 5] = ["host", "name", "user", "pass", "schema"];

pub struct ConfigLoader;

impl ConfigLoader {
    /// Loads database settings from `config/Store.toml` (if present) and the
    /// `DB_` environment variables, which take precedence.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Missing` when a required setting is absent and
    /// `ConfigError::Invalid` when a value cannot be parsed or validated.
    pub fn load() -> Result<DatabaseConfig, ConfigError> {
        Self::load_from(DEFAULT_CONFIG_PATH)
    }

    /// Same as [`ConfigLoader::load`] with an explicit settings file.
    ///
    /// # Errors
    ///
    /// See [`ConfigLoader::load`].
    pub fn load_from(path: impl AsRef<Path>) -> Result<DatabaseConfig, ConfigError> {
        let path = path.as_ref();
        tracing::debug!("Loading database settings (file: {})", path.display());

        let mut figment = Figment::new()
            .merge(Toml::file(path))
            .merge(Env::prefixed("DB_").ignore(&RAW_SETTINGS));

        for key in RAW_SETTINGS {
            if let Ok(value) = std::env::var(format!("DB_{}", key.to_uppercase())) {
                figment = figment.merge(Serialized::default(key, value));
            }
        }

        let config: DatabaseConfig = figment.extract().map_err(ConfigError::from)?;

        config.validate()?;
        Ok(config)
    }
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        match &err.kind {
            Kind::MissingField(field) => {
                ConfigError::Missing(format!("DB_{}", field.to_uppercase()))
            }
            _ => ConfigError::Invalid(err.to_string()),
        }
    }
}
