use thiserror::Error;

use super::models::LookupKey;

/// Caller-facing outcome of a failed resolution.
///
/// A resolution either fully succeeds with an entity or fails with
/// exactly one of these. Store-tier problems never appear here: the
/// chain degrades a store failure to a miss and keeps going.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// The upstream provider explicitly reported no data for this key.
    /// A client-side outcome, not retried.
    #[error("no result for {0}")]
    NotFound(LookupKey),

    /// Transport-level failure reaching the upstream provider (network
    /// error, timeout, undecodable body). A server-side outcome, not
    /// retried.
    #[error("upstream lookup failed: {0}")]
    Upstream(#[source] anyhow::Error),
}
