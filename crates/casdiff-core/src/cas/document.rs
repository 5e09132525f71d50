use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::cas::FeatureValue;
use crate::errors::{CasDiffError, Result};

/// Opaque address of a feature structure inside one [`DocumentState`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Addr(usize);

impl Addr {
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    pub fn index(&self) -> usize {
        self.0
    }
}

impl std::fmt::Display for Addr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Character offsets of an annotation, `begin` inclusive, `end` exclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Span {
    pub begin: usize,
    pub end: usize,
}

impl Span {
    pub fn new(begin: usize, end: usize) -> Self {
        Self { begin, end }
    }

    /// Whether this span lies within `[begin, end]`
    pub fn is_covered_by(&self, begin: usize, end: usize) -> bool {
        begin <= self.begin && self.end <= end
    }
}

/// One typed feature structure
///
/// A structure with a span is an annotation; one without is a plain
/// structure (for example a link record inside a multi-valued feature).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureStructure {
    pub type_name: String,
    pub span: Option<Span>,
    pub features: BTreeMap<String, FeatureValue>,
}

impl FeatureStructure {
    pub fn is_annotation(&self) -> bool {
        self.span.is_some()
    }

    /// Value of a feature; `None` when the structure does not carry it
    pub fn feature(&self, name: &str) -> Option<&FeatureValue> {
        self.features.get(name)
    }

    /// Sorted names of all features set on this structure
    pub fn feature_names(&self) -> impl Iterator<Item = &str> {
        self.features.keys().map(|k| k.as_str())
    }
}

/// One party's annotated representation of a document
///
/// Structures live in an append-only arena; an [`Addr`] handed out by
/// `add_annotation`/`add_structure` stays valid for the lifetime of the
/// document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentState {
    text: String,
    structures: Vec<FeatureStructure>,
}

impl DocumentState {
    /// Create an empty document with the given text
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            structures: Vec::new(),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Number of structures in the arena
    pub fn len(&self) -> usize {
        self.structures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.structures.is_empty()
    }

    /// Add an annotation spanning `[begin, end)`
    pub fn add_annotation(&mut self, type_name: impl Into<String>, begin: usize, end: usize) -> Addr {
        self.push(FeatureStructure {
            type_name: type_name.into(),
            span: Some(Span::new(begin, end)),
            features: BTreeMap::new(),
        })
    }

    /// Add a plain (offset-less) feature structure
    pub fn add_structure(&mut self, type_name: impl Into<String>) -> Addr {
        self.push(FeatureStructure {
            type_name: type_name.into(),
            span: None,
            features: BTreeMap::new(),
        })
    }

    fn push(&mut self, fs: FeatureStructure) -> Addr {
        self.structures.push(fs);
        Addr::new(self.structures.len() - 1)
    }

    /// Set a feature value on the structure at `addr`
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if `addr` does not belong to this document.
    pub fn set_feature(
        &mut self,
        addr: Addr,
        name: impl Into<String>,
        value: impl Into<FeatureValue>,
    ) -> Result<()> {
        let fs = self
            .structures
            .get_mut(addr.index())
            .ok_or_else(|| CasDiffError::InvalidInput {
                reason: format!("address {} is not part of this document", addr),
            })?;
        fs.features.insert(name.into(), value.into());
        Ok(())
    }

    /// Look up the structure at `addr`
    pub fn get(&self, addr: Addr) -> Option<&FeatureStructure> {
        self.structures.get(addr.index())
    }

    /// Span of the annotation at `addr`, `None` for plain structures
    pub fn span_of(&self, addr: Addr) -> Option<Span> {
        self.get(addr).and_then(|fs| fs.span)
    }

    /// All annotations of `type_name`, in annotation index order
    /// (begin ascending, end descending, then address)
    pub fn select(&self, type_name: &str) -> Vec<(Addr, &FeatureStructure)> {
        self.select_where(type_name, |_| true)
    }

    /// Annotations of `type_name` lying within `[begin, end]`
    pub fn select_covered(
        &self,
        type_name: &str,
        begin: usize,
        end: usize,
    ) -> Vec<(Addr, &FeatureStructure)> {
        self.select_where(type_name, |span| span.is_covered_by(begin, end))
    }

    fn select_where<F>(&self, type_name: &str, keep: F) -> Vec<(Addr, &FeatureStructure)>
    where
        F: Fn(&Span) -> bool,
    {
        let mut selected: Vec<(Addr, &FeatureStructure)> = self
            .structures
            .iter()
            .enumerate()
            .filter(|(_, fs)| fs.type_name == type_name)
            .filter(|(_, fs)| fs.span.as_ref().is_some_and(&keep))
            .map(|(i, fs)| (Addr::new(i), fs))
            .collect();
        selected.sort_by(|(a_addr, a), (b_addr, b)| {
            let (a_span, b_span) = (a.span.unwrap_or_default(), b.span.unwrap_or_default());
            a_span
                .begin
                .cmp(&b_span.begin)
                .then(b_span.end.cmp(&a_span.end))
                .then(a_addr.cmp(b_addr))
        });
        selected
    }
}

impl Default for Span {
    fn default() -> Self {
        Span::new(0, 0)
    }
}
