//! Service layer: the in-memory cache and the resolution chain.

pub mod cache;
pub mod resolver;

pub use cache::EntityCache;
pub use resolver::{PersistFailureHook, Resolver};
