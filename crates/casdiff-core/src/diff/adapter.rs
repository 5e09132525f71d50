//! Layer adapters.
//!
//! An adapter knows, for one layer, how a record maps to its primary
//! [`Position`], which link slots fan out into secondary positions and which
//! features take part in structural equality.

use std::collections::BTreeSet;

use crate::cas::{Addr, DocumentState, FeatureStructure, FeatureValue, Span};
use crate::diff::position::{LinkCompareBehavior, LinkKey, LinkSlot, Position};

/// Declaration of one multi-valued link feature
///
/// Slots of the feature are compared as secondary positions. Without a
/// target feature the slot element itself is the target annotation; without
/// a role feature every slot has the empty role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkFeatureDecl {
    pub name: String,
    pub role_feature: Option<String>,
    pub target_feature: Option<String>,
}

impl LinkFeatureDecl {
    pub fn new(
        name: impl Into<String>,
        role_feature: Option<&str>,
        target_feature: Option<&str>,
    ) -> Self {
        Self {
            name: name.into(),
            role_feature: role_feature.map(str::to_string),
            target_feature: target_feature.map(str::to_string),
        }
    }

    /// Role and target span of one slot element
    ///
    /// Returns `None` when the slot does not point at an annotation.
    pub fn resolve_slot(&self, doc: &DocumentState, element: &FeatureValue) -> Option<(String, Span)> {
        let slot_addr = element.as_addr()?;
        match &self.target_feature {
            None => {
                let span = doc.span_of(slot_addr)?;
                Some((String::new(), span))
            }
            Some(target_feature) => {
                let link = doc.get(slot_addr)?;
                let target = link.feature(target_feature)?.as_addr()?;
                let span = doc.span_of(target)?;
                let role = self
                    .role_feature
                    .as_deref()
                    .and_then(|f| link.feature(f))
                    .and_then(FeatureValue::as_str)
                    .unwrap_or_default()
                    .to_string();
                Some((role, span))
            }
        }
    }

    /// Address of the target annotation of one slot element
    pub fn slot_target(&self, doc: &DocumentState, element: &FeatureValue) -> Option<Addr> {
        let slot_addr = element.as_addr()?;
        match &self.target_feature {
            None => Some(slot_addr),
            Some(target_feature) => doc.get(slot_addr)?.feature(target_feature)?.as_addr(),
        }
    }

    /// Whether a slot element belongs to the secondary position keyed by `key`
    pub fn slot_matches(&self, doc: &DocumentState, element: &FeatureValue, key: &LinkKey) -> bool {
        let Some((role, span)) = self.resolve_slot(doc, element) else {
            return false;
        };
        match key {
            LinkKey::Role { role: wanted } => &role == wanted,
            LinkKey::Target { begin, end } => span.begin == *begin && span.end == *end,
        }
    }
}

/// Adapter for span-like layers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpanDiffAdapter {
    layer: String,
    label_features: Vec<String>,
    link_features: Vec<LinkFeatureDecl>,
}

/// Adapter for relation-like layers whose identity is the offsets of both
/// endpoint annotations
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationDiffAdapter {
    layer: String,
    source_feature: String,
    target_feature: String,
    label_features: Vec<String>,
    link_features: Vec<LinkFeatureDecl>,
}

impl RelationDiffAdapter {
    pub fn source_feature(&self) -> &str {
        &self.source_feature
    }

    pub fn target_feature(&self) -> &str {
        &self.target_feature
    }
}

/// Closed set of layer adapters
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiffAdapter {
    Span(SpanDiffAdapter),
    Relation(RelationDiffAdapter),
}

impl DiffAdapter {
    /// Span adapter comparing the given label features
    pub fn span<I, S>(layer: impl Into<String>, label_features: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        DiffAdapter::Span(SpanDiffAdapter {
            layer: layer.into(),
            label_features: label_features.into_iter().map(Into::into).collect(),
            link_features: Vec::new(),
        })
    }

    /// Relation adapter reading endpoints from `source_feature` and
    /// `target_feature`
    pub fn relation<I, S>(
        layer: impl Into<String>,
        source_feature: impl Into<String>,
        target_feature: impl Into<String>,
        label_features: I,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        DiffAdapter::Relation(RelationDiffAdapter {
            layer: layer.into(),
            source_feature: source_feature.into(),
            target_feature: target_feature.into(),
            label_features: label_features.into_iter().map(Into::into).collect(),
            link_features: Vec::new(),
        })
    }

    /// Declare a link feature; its name also becomes a label feature
    pub fn with_link_feature(
        mut self,
        name: &str,
        role_feature: Option<&str>,
        target_feature: Option<&str>,
    ) -> Self {
        self.add_link_feature(name, role_feature, target_feature);
        self
    }

    pub fn add_link_feature(
        &mut self,
        name: &str,
        role_feature: Option<&str>,
        target_feature: Option<&str>,
    ) {
        let (labels, links) = match self {
            DiffAdapter::Span(a) => (&mut a.label_features, &mut a.link_features),
            DiffAdapter::Relation(a) => (&mut a.label_features, &mut a.link_features),
        };
        links.push(LinkFeatureDecl::new(name, role_feature, target_feature));
        if !labels.iter().any(|l| l == name) {
            labels.push(name.to_string());
        }
    }

    pub fn layer(&self) -> &str {
        match self {
            DiffAdapter::Span(a) => &a.layer,
            DiffAdapter::Relation(a) => &a.layer,
        }
    }

    /// Features compared by structural equality, link features included
    pub fn label_features(&self) -> &[String] {
        match self {
            DiffAdapter::Span(a) => &a.label_features,
            DiffAdapter::Relation(a) => &a.label_features,
        }
    }

    pub fn link_features(&self) -> &[LinkFeatureDecl] {
        match self {
            DiffAdapter::Span(a) => &a.link_features,
            DiffAdapter::Relation(a) => &a.link_features,
        }
    }

    pub fn link_feature(&self, name: &str) -> Option<&LinkFeatureDecl> {
        self.link_features().iter().find(|d| d.name == name)
    }

    /// Primary position of the record at `addr`
    ///
    /// `None` when the record is not an annotation or, for relations, when
    /// an endpoint does not resolve to an annotation.
    pub fn position(&self, doc_index: usize, doc: &DocumentState, addr: Addr) -> Option<Position> {
        match self {
            DiffAdapter::Span(a) => {
                let span = doc.span_of(addr)?;
                Some(Position::span(doc_index, a.layer.clone(), span.begin, span.end))
            }
            DiffAdapter::Relation(a) => {
                let fs = doc.get(addr)?;
                let source = endpoint_span(doc, fs, &a.source_feature)?;
                let target = endpoint_span(doc, fs, &a.target_feature)?;
                Some(Position::relation(
                    doc_index,
                    a.layer.clone(),
                    (source.begin, source.end),
                    (target.begin, target.end),
                ))
            }
        }
    }

    /// Secondary positions for the link slots of the record at `addr`
    ///
    /// One position per distinct slot key; slots sharing a key collapse into
    /// the same position.
    pub fn sub_positions(
        &self,
        primary: &Position,
        doc: &DocumentState,
        addr: Addr,
        behavior: LinkCompareBehavior,
    ) -> Vec<Position> {
        let Some(fs) = doc.get(addr) else {
            return Vec::new();
        };

        let mut positions = BTreeSet::new();
        for decl in self.link_features() {
            let Some(slots) = fs.feature(&decl.name).and_then(FeatureValue::as_array) else {
                continue;
            };
            for element in slots {
                let Some((role, span)) = decl.resolve_slot(doc, element) else {
                    continue;
                };
                let key = match behavior {
                    LinkCompareBehavior::LinkTargetAsLabel => LinkKey::Role { role },
                    LinkCompareBehavior::LinkRoleAsLabel => LinkKey::Target {
                        begin: span.begin,
                        end: span.end,
                    },
                };
                positions.insert(primary.with_link(LinkSlot {
                    feature: decl.name.clone(),
                    behavior,
                    key,
                }));
            }
        }
        positions.into_iter().collect()
    }
}

fn endpoint_span(doc: &DocumentState, fs: &FeatureStructure, feature: &str) -> Option<Span> {
    let endpoint = fs.feature(feature)?.as_addr()?;
    doc.span_of(endpoint)
}
