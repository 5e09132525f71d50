//! Layer schema declarations
//!
//! Defines the structure of diff configuration files (YAML or JSON) and the
//! programmatic layer/feature declarations adapters are built from.

use serde::{Deserialize, Serialize};

use crate::diff::position::LinkCompareBehavior;
use crate::errors::{CasDiffError, Result};

/// Top-level diff configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DiffConfig {
    /// How link slots are compared, for the whole run
    #[serde(default, deserialize_with = "deserialize_behavior")]
    pub link_compare_behavior: LinkCompareBehavior,

    /// Compare link features as part of their host record
    #[serde(default)]
    pub recurse_into_link_features: bool,

    /// Layers to compare
    #[serde(default)]
    pub layers: Vec<LayerSchema>,
}

/// Kind of annotation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayerKind {
    Span,
    Relation,
    /// Coreference-style chains; not compared
    Chain,
}

/// How a feature links to other annotations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkMode {
    /// Plain label feature
    #[default]
    None,
    /// Slots point at their targets directly
    Simple,
    /// Slots are link records carrying a role and a target
    WithRole,
}

impl LinkMode {
    /// Parse a link mode name for `feature`
    ///
    /// # Errors
    ///
    /// Returns `UnknownLinkMode` for unsupported names.
    pub fn parse(feature: &str, text: &str) -> Result<Self> {
        match text.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "none" => Ok(LinkMode::None),
            "simple" => Ok(LinkMode::Simple),
            "with_role" => Ok(LinkMode::WithRole),
            _ => Err(CasDiffError::UnknownLinkMode {
                feature: feature.to_string(),
                mode: text.to_string(),
            }),
        }
    }
}

/// Declaration of one annotation layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerSchema {
    /// Layer (annotation type) name
    pub name: String,

    pub kind: LayerKind,

    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Endpoint feature names, relation layers only
    #[serde(default)]
    pub source_feature: Option<String>,
    #[serde(default)]
    pub target_feature: Option<String>,

    #[serde(default)]
    pub features: Vec<FeatureSchema>,
}

/// Declaration of one feature of a layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureSchema {
    pub name: String,

    #[serde(default = "default_enabled")]
    pub enabled: bool,

    #[serde(default)]
    pub link_mode: LinkMode,

    /// Role feature on the link record
    #[serde(default)]
    pub link_type_role_feature: Option<String>,

    /// Target feature on the link record
    #[serde(default)]
    pub link_type_target_feature: Option<String>,
}

fn default_enabled() -> bool {
    true
}

impl LayerSchema {
    pub fn span(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: LayerKind::Span,
            enabled: true,
            source_feature: None,
            target_feature: None,
            features: Vec::new(),
        }
    }

    pub fn relation(
        name: impl Into<String>,
        source_feature: impl Into<String>,
        target_feature: impl Into<String>,
    ) -> Self {
        Self {
            kind: LayerKind::Relation,
            source_feature: Some(source_feature.into()),
            target_feature: Some(target_feature.into()),
            ..Self::span(name)
        }
    }

    pub fn with_feature(mut self, feature: FeatureSchema) -> Self {
        self.features.push(feature);
        self
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }
}

impl FeatureSchema {
    /// Plain label feature
    pub fn label(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            enabled: true,
            link_mode: LinkMode::None,
            link_type_role_feature: None,
            link_type_target_feature: None,
        }
    }

    /// Link feature with the given mode
    pub fn link(
        name: impl Into<String>,
        link_mode: LinkMode,
        role_feature: Option<&str>,
        target_feature: Option<&str>,
    ) -> Self {
        Self {
            link_mode,
            link_type_role_feature: role_feature.map(str::to_string),
            link_type_target_feature: target_feature.map(str::to_string),
            ..Self::label(name)
        }
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    pub fn is_link(&self) -> bool {
        self.link_mode != LinkMode::None
    }
}

/// Accept any spelling [`LinkCompareBehavior::from_str`] accepts
fn deserialize_behavior<'de, D>(deserializer: D) -> std::result::Result<LinkCompareBehavior, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Error;

    let text = String::deserialize(deserializer)?;
    text.parse().map_err(|e: CasDiffError| D::Error::custom(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_link_mode_parse() {
        assert_eq!(LinkMode::parse("arguments", "WITH_ROLE").unwrap(), LinkMode::WithRole);
        assert_eq!(LinkMode::parse("arguments", "simple").unwrap(), LinkMode::Simple);
        let err = LinkMode::parse("arguments", "MULTI").unwrap_err();
        assert_eq!(
            err,
            CasDiffError::UnknownLinkMode {
                feature: "arguments".to_string(),
                mode: "MULTI".to_string(),
            }
        );
    }

    #[test]
    fn test_builders() {
        let layer = LayerSchema::relation("Dependency", "Governor", "Dependent")
            .with_feature(FeatureSchema::label("DependencyType"))
            .with_feature(FeatureSchema::label("flavor").disabled());
        assert_eq!(layer.kind, LayerKind::Relation);
        assert!(layer.enabled);
        assert_eq!(layer.source_feature.as_deref(), Some("Governor"));
        assert!(!layer.features[1].enabled);
        assert!(!layer.features[0].is_link());
    }
}
