//! In-memory entity cache shared across concurrent resolutions.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::domain::models::LookupKey;

/// Unbounded key→entity map with process lifetime.
///
/// Constructor-injected into the resolver so tests get isolation and an
/// evicting implementation can be swapped in later. No capacity bound
/// and no eviction policy; entries live until the process exits.
/// Concurrent readers and writers are safe; simultaneous writes to the
/// same key are last-write-wins.
#[derive(Debug)]
pub struct EntityCache<E> {
    entries: Arc<RwLock<HashMap<LookupKey, E>>>,
}

impl<E: Clone> EntityCache<E> {
    pub fn new() -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Fetch a clone of the cached entity, if present.
    pub async fn get(&self, key: &LookupKey) -> Option<E> {
        self.entries.read().await.get(key).cloned()
    }

    pub async fn insert(&self, key: LookupKey, entity: E) {
        self.entries.write().await.insert(key, entity);
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

impl<E> Clone for EntityCache<E> {
    fn clone(&self) -> Self {
        Self {
            entries: Arc::clone(&self.entries),
        }
    }
}

impl<E: Clone> Default for EntityCache<E> {
    fn default() -> Self {
        Self::new()
    }
}
