//! Domain models for the lookup service.

pub mod config;
pub mod key;
pub mod movie;
pub mod weather;

pub use config::{Config, DatabaseConfig, LoggingConfig, OmdbConfig, WeatherConfig};
pub use key::LookupKey;
pub use movie::{Movie, OmdbResponse};
pub use weather::{Coord, OpenWeatherResponse, Weather, WeatherCondition, WeatherMain};
