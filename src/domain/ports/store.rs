use async_trait::async_trait;

use super::errors::StoreError;
use crate::domain::models::LookupKey;

/// Persistent key→entity storage consulted between the cache and the
/// upstream provider.
///
/// Implementations are assumed internally safe for concurrent use. The
/// chain never updates or deletes through this port: records are only
/// read, and written once after an upstream hit.
#[async_trait]
pub trait EntityStore<E>: Send + Sync {
    /// Look up an entity by its canonical key.
    ///
    /// Returns `Ok(None)` when no record exists. A ready store with no
    /// record and an unavailable store are deliberately
    /// indistinguishable to the caller's control flow; only the error
    /// variant differs for logging.
    async fn get(&self, key: &LookupKey) -> Result<Option<E>, StoreError>;

    /// Durably insert an entity under the given canonical key.
    ///
    /// The key is the one the original lookup was resolved with, so a
    /// later probe for the same request finds the record. Conflict
    /// behavior on duplicate inserts is delegated to the store itself.
    async fn insert(&self, key: &LookupKey, entity: &E) -> Result<(), StoreError>;
}
