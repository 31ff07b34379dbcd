//! Normalized lookup keys shared by every resolution tier.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Canonical identifier for a cached, stored, or fetched entity.
///
/// A `LookupKey` is produced deterministically from raw user input by
/// [`LookupKey::normalize`] and is the only key form used against the
/// cache, the store, and outbound provider queries. Using the same fold
/// everywhere is load-bearing: if the store key and the provider query
/// key ever diverge, records written after an upstream fetch become
/// permanently unreachable on later lookups.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LookupKey(String);

impl LookupKey {
    /// Fold raw input into canonical form.
    ///
    /// Uppercase fold plus leading/trailing whitespace trim. Pure and
    /// total: every string input yields a key, and the operation is
    /// idempotent.
    pub fn normalize(raw: &str) -> Self {
        Self(raw.trim().to_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for LookupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
