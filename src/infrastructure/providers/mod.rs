//! Upstream provider adapters (reqwest).

pub mod omdb;
pub mod open_weather;

pub use omdb::OmdbClient;
pub use open_weather::OpenWeatherClient;
