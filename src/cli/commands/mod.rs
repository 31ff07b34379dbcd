//! Command executors.

pub mod movie;
pub mod weather;
