//! Party-agnostic comparison positions.
//!
//! Two annotation records are only ever compared when they map to the same
//! [`Position`]. A position says *where* a unit of comparison lives
//! (document index, layer, offsets and, for link slots, the slot key) and
//! never *who* produced it.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::errors::CasDiffError;

/// How slots of multi-valued link features are compared
///
/// Chosen once per diff invocation, not per feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LinkCompareBehavior {
    /// Slots are keyed by role; two slots agree when their targets are at
    /// the same position
    LinkTargetAsLabel,
    /// Slots are keyed by target offsets; two slots agree when their roles
    /// are equal
    LinkRoleAsLabel,
}

impl LinkCompareBehavior {
    pub fn name(&self) -> &'static str {
        match self {
            LinkCompareBehavior::LinkTargetAsLabel => "LINK_TARGET_AS_LABEL",
            LinkCompareBehavior::LinkRoleAsLabel => "LINK_ROLE_AS_LABEL",
        }
    }
}

impl Default for LinkCompareBehavior {
    fn default() -> Self {
        LinkCompareBehavior::LinkTargetAsLabel
    }
}

impl FromStr for LinkCompareBehavior {
    type Err = CasDiffError;

    /// Parse a comparison mode name
    ///
    /// # Errors
    ///
    /// Returns `UnsupportedLinkCompareBehavior` for any name other than the
    /// two supported modes.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().replace('-', "_").as_str() {
            "LINK_TARGET_AS_LABEL" | "TARGET_AS_LABEL" => Ok(LinkCompareBehavior::LinkTargetAsLabel),
            "LINK_ROLE_AS_LABEL" | "ROLE_AS_LABEL" => Ok(LinkCompareBehavior::LinkRoleAsLabel),
            _ => Err(CasDiffError::UnsupportedLinkCompareBehavior {
                mode: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for LinkCompareBehavior {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Offsets that locate a primary position
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Anchor {
    Span {
        begin: usize,
        end: usize,
    },
    Relation {
        source_begin: usize,
        source_end: usize,
        target_begin: usize,
        target_end: usize,
    },
}

impl Anchor {
    /// Leading begin offset (the source side for relations)
    pub fn begin(&self) -> usize {
        match self {
            Anchor::Span { begin, .. } => *begin,
            Anchor::Relation { source_begin, .. } => *source_begin,
        }
    }

    /// Leading end offset (the source side for relations)
    pub fn end(&self) -> usize {
        match self {
            Anchor::Span { end, .. } => *end,
            Anchor::Relation { source_end, .. } => *source_end,
        }
    }
}

/// Key of one link slot within a secondary position
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LinkKey {
    /// Role string (target-as-label mode)
    Role { role: String },
    /// Target offsets (role-as-label mode)
    Target { begin: usize, end: usize },
}

/// Link feature part of a secondary position
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LinkSlot {
    pub feature: String,
    pub behavior: LinkCompareBehavior,
    pub key: LinkKey,
}

/// Identity of "where" a unit of comparison lives
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    doc_index: usize,
    layer: String,
    anchor: Anchor,
    link: Option<LinkSlot>,
}

impl Position {
    /// Primary position of a span-like record
    pub fn span(doc_index: usize, layer: impl Into<String>, begin: usize, end: usize) -> Self {
        Self {
            doc_index,
            layer: layer.into(),
            anchor: Anchor::Span { begin, end },
            link: None,
        }
    }

    /// Primary position of a relation-like record
    pub fn relation(
        doc_index: usize,
        layer: impl Into<String>,
        source: (usize, usize),
        target: (usize, usize),
    ) -> Self {
        Self {
            doc_index,
            layer: layer.into(),
            anchor: Anchor::Relation {
                source_begin: source.0,
                source_end: source.1,
                target_begin: target.0,
                target_end: target.1,
            },
            link: None,
        }
    }

    /// Secondary position for one link slot of this primary position
    pub fn with_link(&self, link: LinkSlot) -> Self {
        Self {
            doc_index: self.doc_index,
            layer: self.layer.clone(),
            anchor: self.anchor,
            link: Some(link),
        }
    }

    pub fn doc_index(&self) -> usize {
        self.doc_index
    }

    pub fn layer(&self) -> &str {
        &self.layer
    }

    pub fn anchor(&self) -> &Anchor {
        &self.anchor
    }

    pub fn link(&self) -> Option<&LinkSlot> {
        self.link.as_ref()
    }

    /// Link feature name for secondary positions
    pub fn link_feature(&self) -> Option<&str> {
        self.link.as_ref().map(|l| l.feature.as_str())
    }

    pub fn is_link(&self) -> bool {
        self.link.is_some()
    }

    /// Whether both positions locate the same layer and offsets, regardless
    /// of document index and link slot
    pub fn same_location(&self, other: &Position) -> bool {
        self.layer == other.layer && self.anchor == other.anchor
    }

    fn sort_key(&self) -> (usize, usize, usize, &str, &Anchor, &Option<LinkSlot>) {
        (
            self.doc_index,
            self.anchor.begin(),
            self.anchor.end(),
            &self.layer,
            &self.anchor,
            &self.link,
        )
    }
}

impl Ord for Position {
    fn cmp(&self, other: &Self) -> Ordering {
        self.sort_key().cmp(&other.sort_key())
    }
}

impl PartialOrd for Position {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{} {} ", self.doc_index, self.layer)?;
        match &self.anchor {
            Anchor::Span { begin, end } => write!(f, "[{}-{}]", begin, end)?,
            Anchor::Relation {
                source_begin,
                source_end,
                target_begin,
                target_end,
            } => write!(
                f,
                "[{}-{}] -> [{}-{}]",
                source_begin, source_end, target_begin, target_end
            )?,
        }
        if let Some(link) = &self.link {
            match &link.key {
                LinkKey::Role { role } => write!(f, " {} role \"{}\"", link.feature, role)?,
                LinkKey::Target { begin, end } => {
                    write!(f, " {} target [{}-{}]", link.feature, begin, end)?
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equal_positions_ignore_construction_order() {
        let a = Position::span(0, "NamedEntity", 0, 5);
        let b = Position::span(0, "NamedEntity", 0, 5);
        assert_eq!(a, b);
        assert_eq!(a.cmp(&b), Ordering::Equal);
    }

    #[test]
    fn test_ordering_is_by_document_then_offsets() {
        let mut positions = vec![
            Position::span(1, "NamedEntity", 0, 5),
            Position::span(0, "NamedEntity", 10, 15),
            Position::span(0, "NamedEntity", 0, 5),
            Position::span(0, "Lemma", 0, 5),
        ];
        positions.sort();
        let rendered: Vec<String> = positions.iter().map(|p| p.to_string()).collect();
        assert_eq!(
            rendered,
            vec![
                "#0 Lemma [0-5]",
                "#0 NamedEntity [0-5]",
                "#0 NamedEntity [10-15]",
                "#1 NamedEntity [0-5]",
            ]
        );
    }

    #[test]
    fn test_link_positions_differ_from_primary() {
        let primary = Position::span(0, "Event", 0, 5);
        let slot = primary.with_link(LinkSlot {
            feature: "arguments".to_string(),
            behavior: LinkCompareBehavior::LinkRoleAsLabel,
            key: LinkKey::Target { begin: 10, end: 12 },
        });
        assert_ne!(primary, slot);
        assert!(primary < slot);
        assert!(slot.same_location(&primary));
        assert_eq!(slot.link_feature(), Some("arguments"));
        assert_eq!(slot.to_string(), "#0 Event [0-5] arguments target [10-12]");
    }

    #[test]
    fn test_behavior_parsing() {
        assert_eq!(
            "LINK_ROLE_AS_LABEL".parse::<LinkCompareBehavior>().unwrap(),
            LinkCompareBehavior::LinkRoleAsLabel
        );
        assert_eq!(
            "target-as-label".parse::<LinkCompareBehavior>().unwrap(),
            LinkCompareBehavior::LinkTargetAsLabel
        );
        let err = "LINK_ANYTHING".parse::<LinkCompareBehavior>().unwrap_err();
        assert!(matches!(
            err,
            CasDiffError::UnsupportedLinkCompareBehavior { .. }
        ));
    }
}
