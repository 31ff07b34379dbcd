use thiserror::Error;

/// Failures surfaced by an [`EntityStore`](super::EntityStore).
///
/// The resolution chain treats both variants as a miss; the split
/// exists so the persistence path can log them distinctly.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store never signalled readiness within the caller's budget,
    /// or the readiness gate was torn down.
    #[error("store not available")]
    Unavailable,

    /// The store was reachable but the operation itself failed.
    #[error("store operation failed: {0}")]
    Query(#[source] anyhow::Error),
}

/// Failures surfaced by an [`UpstreamProvider`](super::UpstreamProvider).
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Structurally valid response carrying the provider's own "no data
    /// for this key" marker.
    #[error("provider reported no result")]
    NoResult,

    /// Network failure, timeout, or undecodable response body.
    #[error("provider request failed: {0}")]
    Transport(#[source] anyhow::Error),
}
