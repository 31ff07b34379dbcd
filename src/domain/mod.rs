//! Domain layer for the lookup service
//!
//! This module contains core business logic and domain models.

pub mod error;
pub mod models;
pub mod ports;

pub use error::ResolveError;
