//! Infrastructure layer: configuration, SQLite stores, HTTP providers.

pub mod config;
pub mod database;
pub mod providers;
