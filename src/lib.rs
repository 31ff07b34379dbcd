//! Lookupd - Tiered Movie and Weather Lookup Service
//!
//! Lookupd answers movie-details and city-weather lookups through a
//! three-tier resolution chain: an in-memory cache, a persistent SQLite
//! store, and a fallback fetch from a third-party provider (OMDb or
//! OpenWeather) whose result is cached synchronously and persisted
//! asynchronously for future requests.
//!
//! # Architecture
//!
//! This crate follows Clean Architecture / Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain`): Models, the error taxonomy, and the
//!   `EntityStore` / `UpstreamProvider` port traits
//! - **Service Layer** (`services`): The resolution chain and the
//!   in-memory cache
//! - **Infrastructure Layer** (`infrastructure`): Configuration
//!   loading, the gated SQLite stores, and the HTTP provider clients
//! - **CLI Layer** (`cli`): Thin command-line front end
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use lookupd::{EntityCache, Resolver};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let resolver = Resolver::new(EntityCache::new(), store, provider);
//!     let movie = resolver.resolve("inception").await?;
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::error::ResolveError;
pub use domain::models::{
    Config, DatabaseConfig, LoggingConfig, LookupKey, Movie, OmdbConfig, Weather,
    WeatherConfig,
};
pub use domain::ports::{EntityStore, ProviderError, StoreError, UpstreamProvider};
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use infrastructure::database::{
    connect_in_background, DatabaseHandle, SqliteMovieStore, SqliteWeatherStore,
};
pub use infrastructure::providers::{OmdbClient, OpenWeatherClient};
pub use services::{EntityCache, Resolver};
