use async_trait::async_trait;

use super::errors::ProviderError;
use crate::domain::models::LookupKey;

/// Third-party data source consulted only after a full local miss.
///
/// Implementations query by the canonical key and return entities whose
/// own title/name has already been folded to canonical notation, so the
/// chain can cache them under the key the next lookup will produce.
#[async_trait]
pub trait UpstreamProvider<E>: Send + Sync {
    /// Fetch an entity for the key, one outbound request per call.
    ///
    /// `ProviderError::NoResult` means the provider answered and
    /// explicitly had nothing; `ProviderError::Transport` means the
    /// provider could not be reached or its answer could not be read.
    async fn fetch(&self, key: &LookupKey) -> Result<E, ProviderError>;
}
