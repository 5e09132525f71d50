//! Party identity
//!
//! A party is one annotator (or the curation pseudo-annotator) whose
//! document states take part in a diff. The identifier is opaque: the
//! engine only ever compares and orders it.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;

/// Name of the pseudo-party holding the curated document
pub const CURATION_PARTY: &str = "CURATION_USER";

/// Opaque identifier of one party (annotator / CAS group)
///
/// Ordered lexicographically so that per-party maps iterate
/// deterministically.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PartyId(String);

impl PartyId {
    /// Create a party identifier
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The curation pseudo-party
    pub fn curation() -> Self {
        Self(CURATION_PARTY.to_string())
    }

    /// Whether this is the curation pseudo-party
    pub fn is_curation(&self) -> bool {
        self.0 == CURATION_PARTY
    }

    /// Get the string representation
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for PartyId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for PartyId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl Borrow<str> for PartyId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PartyId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
