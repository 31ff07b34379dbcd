//! SQLite store adapters behind the readiness gate.

pub mod connection;
pub mod movie_store;
pub mod weather_store;

pub use connection::{connect_in_background, DatabaseHandle, MIGRATOR};
pub use movie_store::SqliteMovieStore;
pub use weather_store::SqliteWeatherStore;
