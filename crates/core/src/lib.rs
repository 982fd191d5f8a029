pub mod config;
pub mod config_loader;

pub use config::{ConfigError, DatabaseConfig, PoolSettings};
pub use config_loader::ConfigLoader;
