use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::OnceLock;

use casdiff_core_types::PartyId;

use crate::cas::{DocumentState, FeatureStructure};
use crate::diff::configuration::{Configuration, ConfigurationSet};
use crate::diff::engine::DocumentMap;
use crate::diff::position::Position;
use crate::errors::{CasDiffError, Result};

#[derive(Debug)]
struct Entry {
    set: ConfigurationSet,
    complete: OnceLock<bool>,
}

/// Immutable outcome of a diff run
///
/// Holds one [`ConfigurationSet`] per position and the universe of parties
/// that took part. Completeness is memoized per set on first query, which
/// keeps the result shareable across threads.
#[derive(Debug)]
pub struct DiffResult {
    entries: BTreeMap<Position, Entry>,
    parties: BTreeSet<PartyId>,
    has_differences: bool,
}

/// Summary counts of a [`DiffResult`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffStats {
    pub positions: usize,
    pub agreeing: usize,
    pub differing: usize,
    pub incomplete: usize,
    pub stacked_configurations: usize,
}

impl DiffResult {
    pub(crate) fn new(sets: BTreeMap<Position, ConfigurationSet>, parties: BTreeSet<PartyId>) -> Self {
        let has_differences = sets.values().any(|set| set.configurations().len() != 1);
        let entries = sets
            .into_iter()
            .map(|(position, set)| {
                (
                    position,
                    Entry {
                        set,
                        complete: OnceLock::new(),
                    },
                )
            })
            .collect();
        Self {
            entries,
            parties,
            has_differences,
        }
    }

    /// Whether every party that contributed at `set` produced the same value
    pub fn is_agreement(&self, set: &ConfigurationSet) -> bool {
        set.configurations().len() == 1
    }

    /// Whether every party of the run contributed at `set`
    ///
    /// Memoized for sets owned by this result.
    pub fn is_complete(&self, set: &ConfigurationSet) -> bool {
        match self.entries.get(set.position()) {
            Some(entry) if std::ptr::eq(&entry.set, set) => {
                *entry.complete.get_or_init(|| self.covers_all_parties(set))
            }
            _ => self.covers_all_parties(set),
        }
    }

    fn covers_all_parties(&self, set: &ConfigurationSet) -> bool {
        let seen: BTreeSet<&PartyId> = set
            .configurations()
            .iter()
            .flat_map(Configuration::parties)
            .collect();
        self.parties.iter().all(|party| seen.contains(&party))
    }

    /// Whether any position has other than exactly one configuration
    pub fn has_differences(&self) -> bool {
        self.has_differences
    }

    pub fn positions(&self) -> impl Iterator<Item = &Position> {
        self.entries.keys()
    }

    /// All configuration sets in position order
    pub fn configuration_sets(&self) -> impl Iterator<Item = &ConfigurationSet> {
        self.entries.values().map(|entry| &entry.set)
    }

    pub fn configuration_set(&self, position: &Position) -> Option<&ConfigurationSet> {
        self.entries.get(position).map(|entry| &entry.set)
    }

    /// Parties taking part in the run, including those with empty slots
    pub fn parties(&self) -> &BTreeSet<PartyId> {
        &self.parties
    }

    pub fn differing_sets(&self) -> impl Iterator<Item = &ConfigurationSet> {
        self.configuration_sets()
            .filter(move |set| !self.is_agreement(set))
    }

    pub fn incomplete_sets(&self) -> impl Iterator<Item = &ConfigurationSet> {
        self.configuration_sets()
            .filter(move |set| !self.is_complete(set))
    }

    pub fn differing_positions(&self) -> Vec<&Position> {
        self.differing_sets().map(ConfigurationSet::position).collect()
    }

    pub fn incomplete_positions(&self) -> Vec<&Position> {
        self.incomplete_sets().map(ConfigurationSet::position).collect()
    }

    /// Number of positions
    pub fn size(&self) -> usize {
        self.entries.len()
    }

    /// Number of positions on `layer`
    pub fn size_of(&self, layer: &str) -> usize {
        self.positions().filter(|p| p.layer() == layer).count()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Resolve the record `party` contributed to `config` against the
    /// caller's document states
    ///
    /// Returns `Ok(None)` when the party did not contribute to `config`.
    ///
    /// # Errors
    ///
    /// - `DocumentNotFound` if the party has no document at the position's index
    /// - `UnknownAddress` if the address does not exist in that document
    pub fn resolve<'d>(
        &self,
        config: &Configuration,
        party: &str,
        documents: &'d DocumentMap,
    ) -> Result<Option<&'d FeatureStructure>> {
        let Some(aid) = config.aid(party) else {
            return Ok(None);
        };
        let doc: &DocumentState = documents
            .get(party)
            .and_then(|slots| slots.get(aid.doc_index))
            .and_then(Option::as_ref)
            .ok_or_else(|| CasDiffError::DocumentNotFound {
                party: party.to_string(),
                doc_index: aid.doc_index,
            })?;
        doc.get(aid.addr)
            .map(Some)
            .ok_or_else(|| CasDiffError::UnknownAddress {
                party: party.to_string(),
                doc_index: aid.doc_index,
                addr: aid.addr.index(),
            })
    }

    pub fn stats(&self) -> DiffStats {
        let mut stats = DiffStats {
            positions: self.size(),
            agreeing: 0,
            differing: 0,
            incomplete: 0,
            stacked_configurations: 0,
        };
        for set in self.configuration_sets() {
            if self.is_agreement(set) {
                stats.agreeing += 1;
            } else {
                stats.differing += 1;
            }
            if !self.is_complete(set) {
                stats.incomplete += 1;
            }
            stats.stacked_configurations += set
                .configurations()
                .iter()
                .filter(|cfg| cfg.is_stacked())
                .count();
        }
        stats
    }
}
