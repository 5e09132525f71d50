//! Correlation types for diff runs
//!
//! Every diff computation is tagged with a `DiffRunId` so that the log
//! events emitted while ingesting one set of documents can be told apart
//! from those of a concurrent or later run.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a single diff computation
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DiffRunId(String);

impl DiffRunId {
    /// Generate a new random DiffRunId using UUIDv7
    pub fn new() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    /// Get the string representation
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for DiffRunId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for DiffRunId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
