//! Configuration model with serde defaults.

use serde::{Deserialize, Serialize};

/// Top-level service configuration.
///
/// Loaded by `infrastructure::config::ConfigLoader` from defaults, a
/// YAML file, and `LOOKUPD_*` environment variables.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Per-request budget for a single resolution, in seconds.
    pub request_timeout_secs: u64,
    pub database: DatabaseConfig,
    pub omdb: OmdbConfig,
    pub weather: WeatherConfig,
    pub logging: LoggingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            request_timeout_secs: 5,
            database: DatabaseConfig::default(),
            omdb: OmdbConfig::default(),
            weather: WeatherConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

/// SQLite connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// SQLite database URL (e.g., "sqlite:lookupd.db" or "sqlite::memory:")
    pub url: String,
    pub max_connections: u32,
    /// Budget for a single connection attempt, in seconds.
    pub connect_timeout_secs: u64,
    /// Pause between failed connection attempts, in seconds.
    pub retry_interval_secs: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite:lookupd.db".to_string(),
            max_connections: 5,
            connect_timeout_secs: 30,
            retry_interval_secs: 5,
        }
    }
}

/// OMDb movie provider settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OmdbConfig {
    pub base_url: String,
    /// API key, typically supplied via LOOKUPD_OMDB__API_KEY.
    pub api_key: String,
    pub timeout_secs: u64,
}

impl Default for OmdbConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.omdbapi.com/".to_string(),
            api_key: String::new(),
            timeout_secs: 5,
        }
    }
}

/// OpenWeather provider settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WeatherConfig {
    pub base_url: String,
    /// API key, typically supplied via LOOKUPD_WEATHER__API_KEY.
    pub api_key: String,
    /// Unit system passed through to the provider (standard, metric, imperial).
    pub units: String,
    pub timeout_secs: u64,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openweathermap.org/data/2.5/weather".to_string(),
            api_key: String::new(),
            units: "metric".to_string(),
            timeout_secs: 5,
        }
    }
}

/// Logging settings for the tracing subscriber.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// One of: trace, debug, info, warn, error
    pub level: String,
    /// One of: json, pretty
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}
