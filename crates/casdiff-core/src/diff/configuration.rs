use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use casdiff_core_types::PartyId;

use crate::cas::Addr;
use crate::diff::position::Position;

/// Address of one record, or one link slot of a record, in one document
///
/// Stays meaningful after the document state has been dropped.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Aid {
    pub doc_index: usize,
    pub addr: Addr,
    pub slot: Option<SlotRef>,
}

/// Link slot within a multi-valued feature
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SlotRef {
    pub feature: String,
    pub index: usize,
}

impl Aid {
    pub fn record(doc_index: usize, addr: Addr) -> Self {
        Self {
            doc_index,
            addr,
            slot: None,
        }
    }

    pub fn slot(doc_index: usize, addr: Addr, feature: impl Into<String>, index: usize) -> Self {
        Self {
            doc_index,
            addr,
            slot: Some(SlotRef {
                feature: feature.into(),
                index,
            }),
        }
    }
}

impl fmt::Display for Aid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.doc_index, self.addr)?;
        if let Some(slot) = &self.slot {
            write!(f, "@{}[{}]", slot.feature, slot.index)?;
        }
        Ok(())
    }
}

/// One distinct value observed at a position
///
/// Holds the addresses of every party that produced this value. A party
/// contributing more than once marks the configuration as stacked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Configuration {
    position: Position,
    addresses: BTreeMap<PartyId, Vec<Aid>>,
    stacked: bool,
}

impl Configuration {
    pub(crate) fn new(position: Position) -> Self {
        Self {
            position,
            addresses: BTreeMap::new(),
            stacked: false,
        }
    }

    pub(crate) fn add(&mut self, party: &PartyId, aid: Aid) {
        let aids = self.addresses.entry(party.clone()).or_default();
        if !aids.is_empty() {
            self.stacked = true;
        }
        aids.push(aid);
    }

    pub fn position(&self) -> &Position {
        &self.position
    }

    pub fn is_stacked(&self) -> bool {
        self.stacked
    }

    /// Parties that produced this value, in party order
    pub fn parties(&self) -> impl Iterator<Item = &PartyId> {
        self.addresses.keys()
    }

    pub fn party_count(&self) -> usize {
        self.addresses.len()
    }

    pub fn contains(&self, party: &str) -> bool {
        self.addresses.contains_key(party)
    }

    /// Most recently recorded address of `party`
    pub fn aid(&self, party: &str) -> Option<&Aid> {
        self.addresses.get(party).and_then(|aids| aids.last())
    }

    /// Every address recorded for `party`, in insertion order
    pub fn aids(&self, party: &str) -> &[Aid] {
        self.addresses.get(party).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Party and address whose record stands in for this value when
    /// comparing (the first party's latest address)
    pub fn representative(&self) -> Option<(&PartyId, &Aid)> {
        self.addresses
            .iter()
            .next()
            .and_then(|(party, aids)| aids.last().map(|aid| (party, aid)))
    }

    pub fn representative_aid(&self) -> Option<&Aid> {
        self.representative().map(|(_, aid)| aid)
    }
}

impl fmt::Display for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let entries: Vec<String> = self
            .addresses
            .iter()
            .filter_map(|(party, aids)| aids.last().map(|aid| format!("{}:{}", party, aid)))
            .collect();
        write!(f, "[{}]", entries.join(", "))?;
        if let Some(rep) = self.representative_aid() {
            write!(f, " -> {}", rep)?;
        }
        Ok(())
    }
}

/// All configurations observed at one position
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigurationSet {
    position: Position,
    configurations: Vec<Configuration>,
    parties: BTreeSet<PartyId>,
}

impl ConfigurationSet {
    pub(crate) fn new(position: Position) -> Self {
        Self {
            position,
            configurations: Vec::new(),
            parties: BTreeSet::new(),
        }
    }

    pub(crate) fn configurations_mut(&mut self) -> &mut Vec<Configuration> {
        &mut self.configurations
    }

    pub(crate) fn record_party(&mut self, party: &PartyId) {
        if !self.parties.contains(party) {
            self.parties.insert(party.clone());
        }
    }

    pub fn position(&self) -> &Position {
        &self.position
    }

    /// Distinct values, in the order they were first observed
    pub fn configurations(&self) -> &[Configuration] {
        &self.configurations
    }

    /// Parties that contributed at least one record here
    pub fn parties(&self) -> &BTreeSet<PartyId> {
        &self.parties
    }

    /// Configurations `party` contributed to
    pub fn configurations_for(&self, party: &str) -> Vec<&Configuration> {
        self.configurations
            .iter()
            .filter(|cfg| cfg.contains(party))
            .collect()
    }

    /// Configurations counted once per contributing party
    pub fn recorded_configuration_count(&self) -> usize {
        self.configurations.iter().map(Configuration::party_count).sum()
    }
}
