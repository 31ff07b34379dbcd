use anyhow::{Context, Result};
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use thiserror::Error;

use crate::domain::models::Config;

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Invalid log format: {0}. Must be one of: json, pretty")]
    InvalidLogFormat(String),

    #[error("Database URL cannot be empty")]
    EmptyDatabaseUrl,

    #[error("Invalid max_connections: {0}. Must be at least 1")]
    InvalidMaxConnections(u32),

    #[error("Invalid {name}: {value}. Must be at least 1 second")]
    InvalidTimeout { name: &'static str, value: u64 },

    #[error("Provider base URL for {0} cannot be empty")]
    EmptyProviderUrl(&'static str),
}

/// Configuration loader with hierarchical merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with hierarchical merging
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults (Serialized)
    /// 2. lookupd.yaml in the working directory
    /// 3. Environment variables (LOOKUPD_* prefix, highest priority)
    pub fn load() -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file("lookupd.yaml"))
            .merge(Env::prefixed("LOOKUPD_").split("__"))
            .extract()
            .context("Failed to extract configuration from figment")?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: impl AsRef<std::path::Path>) -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(path.as_ref()))
            .merge(Env::prefixed("LOOKUPD_").split("__"))
            .extract()
            .context(format!(
                "Failed to load config from {}",
                path.as_ref().display()
            ))?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate configuration after loading
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        if config.database.url.is_empty() {
            return Err(ConfigError::EmptyDatabaseUrl);
        }

        if config.database.max_connections == 0 {
            return Err(ConfigError::InvalidMaxConnections(
                config.database.max_connections,
            ));
        }

        if config.request_timeout_secs == 0 {
            return Err(ConfigError::InvalidTimeout {
                name: "request_timeout_secs",
                value: config.request_timeout_secs,
            });
        }

        if config.omdb.timeout_secs == 0 {
            return Err(ConfigError::InvalidTimeout {
                name: "omdb.timeout_secs",
                value: config.omdb.timeout_secs,
            });
        }

        if config.weather.timeout_secs == 0 {
            return Err(ConfigError::InvalidTimeout {
                name: "weather.timeout_secs",
                value: config.weather.timeout_secs,
            });
        }

        if config.omdb.base_url.is_empty() {
            return Err(ConfigError::EmptyProviderUrl("omdb"));
        }

        if config.weather.base_url.is_empty() {
            return Err(ConfigError::EmptyProviderUrl("weather"));
        }

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&config.logging.level.as_str()) {
            return Err(ConfigError::InvalidLogLevel(config.logging.level.clone()));
        }

        let valid_log_formats = ["json", "pretty"];
        if !valid_log_formats.contains(&config.logging.format.as_str()) {
            return Err(ConfigError::InvalidLogFormat(config.logging.format.clone()));
        }

        Ok(())
    }
}
