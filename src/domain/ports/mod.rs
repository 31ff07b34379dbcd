//! Port trait definitions (Hexagonal Architecture)
//!
//! Async trait interfaces that infrastructure adapters implement:
//! - `EntityStore`: persistent key→entity lookup and insert
//! - `UpstreamProvider`: third-party fetch by key
//!
//! These contracts keep the resolution chain independent of SQLite and
//! of the concrete HTTP providers.

pub mod errors;
pub mod provider;
pub mod store;

pub use errors::{ProviderError, StoreError};
pub use provider::UpstreamProvider;
pub use store::EntityStore;
