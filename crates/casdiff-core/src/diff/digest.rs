//! Digest computation for diff results.
//!
//! Provides a deterministic SHA256 fingerprint of a [`DiffResult`] that
//! depends only on what was compared and how it came out: positions,
//! agreement and completeness per position, and which parties share each
//! configuration. Addresses are left out, so two runs over equal inputs
//! yield equal fingerprints even when records were created in a different
//! order.

use serde::Serialize;
use sha2::{Digest, Sha256};

use casdiff_core_types::PartyId;

use crate::diff::position::Position;
use crate::diff::result::DiffResult;
use crate::errors::Result;

#[derive(Serialize)]
struct CanonicalResult<'r> {
    parties: Vec<&'r PartyId>,
    positions: Vec<CanonicalPosition<'r>>,
}

#[derive(Serialize)]
struct CanonicalPosition<'r> {
    position: &'r Position,
    agreement: bool,
    complete: bool,
    configurations: Vec<Vec<&'r PartyId>>,
}

/// Compute the fingerprint of a diff result.
///
/// ## Returns
///
/// Hex-encoded SHA256 digest (64 characters)
///
/// ## Errors
///
/// Returns `CasDiffError::Serialization` if JSON serialization fails.
pub fn compute_result_digest(result: &DiffResult) -> Result<String> {
    let positions = result
        .configuration_sets()
        .map(|set| {
            let mut configurations: Vec<Vec<&PartyId>> = set
                .configurations()
                .iter()
                .map(|cfg| cfg.parties().collect())
                .collect();
            configurations.sort();
            CanonicalPosition {
                position: set.position(),
                agreement: result.is_agreement(set),
                complete: result.is_complete(set),
                configurations,
            }
        })
        .collect();

    let canonical = CanonicalResult {
        parties: result.parties().iter().collect(),
        positions,
    };
    let json = serde_json::to_string(&canonical)?;
    Ok(hash_string(&json))
}

fn hash_string(s: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(s.as_bytes());
    hex::encode(hasher.finalize())
}

impl DiffResult {
    /// SHA256 fingerprint of this result, see [`compute_result_digest`]
    ///
    /// # Errors
    ///
    /// Returns `CasDiffError::Serialization` if JSON serialization fails.
    pub fn fingerprint(&self) -> Result<String> {
        compute_result_digest(self)
    }
}
