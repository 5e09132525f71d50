//! Adapter construction from layer declarations

use std::collections::HashSet;

use crate::diff::adapter::DiffAdapter;
use crate::errors::{CasDiffError, Result};
use crate::schema::model::{LayerKind, LayerSchema, LinkMode};

/// Build one adapter per enabled, comparable layer
///
/// Disabled layers and features are skipped. Chain layers are not compared
/// and produce no adapter. Link features are declared on the adapter and
/// also become label features.
///
/// # Errors
///
/// - `DuplicateAdapter` if two enabled layers share a name
/// - `IncompleteRelationLayer` if a relation layer lacks an endpoint feature
pub fn build_adapters(layers: &[LayerSchema]) -> Result<Vec<DiffAdapter>> {
    validate_layers(layers)?;

    let mut adapters = Vec::new();
    for layer in layers.iter().filter(|l| l.enabled) {
        let mut labels: Vec<&str> = Vec::new();
        for feature in layer.features.iter().filter(|f| f.enabled && !f.is_link()) {
            if !labels.contains(&feature.name.as_str()) {
                labels.push(&feature.name);
            }
        }

        let mut adapter = match layer.kind {
            LayerKind::Span => DiffAdapter::span(&layer.name, labels),
            LayerKind::Relation => {
                let (source, target) = relation_endpoints(layer)?;
                DiffAdapter::relation(&layer.name, source, target, labels)
            }
            LayerKind::Chain => {
                tracing::debug!(layer = %layer.name, "Curation for chain layers is not supported; skipping");
                continue;
            }
        };

        for feature in layer.features.iter().filter(|f| f.enabled) {
            match feature.link_mode {
                LinkMode::None => {}
                LinkMode::Simple => adapter.add_link_feature(
                    &feature.name,
                    feature.link_type_role_feature.as_deref(),
                    None,
                ),
                LinkMode::WithRole => adapter.add_link_feature(
                    &feature.name,
                    feature.link_type_role_feature.as_deref(),
                    feature.link_type_target_feature.as_deref(),
                ),
            }
        }

        adapters.push(adapter);
    }

    Ok(adapters)
}

/// Check declarations that would make adapter building ambiguous
///
/// # Errors
///
/// Same as [`build_adapters`].
pub fn validate_layers(layers: &[LayerSchema]) -> Result<()> {
    let mut names = HashSet::new();
    for layer in layers.iter().filter(|l| l.enabled) {
        if !names.insert(layer.name.as_str()) {
            return Err(CasDiffError::DuplicateAdapter {
                layer: layer.name.clone(),
            });
        }
        if layer.kind == LayerKind::Relation {
            relation_endpoints(layer)?;
        }
    }
    Ok(())
}

fn relation_endpoints(layer: &LayerSchema) -> Result<(&str, &str)> {
    let source = layer
        .source_feature
        .as_deref()
        .ok_or_else(|| CasDiffError::IncompleteRelationLayer {
            layer: layer.name.clone(),
            missing: "source".to_string(),
        })?;
    let target = layer
        .target_feature
        .as_deref()
        .ok_or_else(|| CasDiffError::IncompleteRelationLayer {
            layer: layer.name.clone(),
            missing: "target".to_string(),
        })?;
    Ok((source, target))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::model::FeatureSchema;

    fn semantic_layers() -> Vec<LayerSchema> {
        vec![
            LayerSchema::span("NamedEntity")
                .with_feature(FeatureSchema::label("value"))
                .with_feature(FeatureSchema::label("identifier").disabled()),
            LayerSchema::span("SemPred")
                .with_feature(FeatureSchema::label("category"))
                .with_feature(FeatureSchema::link(
                    "arguments",
                    LinkMode::WithRole,
                    Some("role"),
                    Some("target"),
                )),
            LayerSchema::relation("Dependency", "Governor", "Dependent")
                .with_feature(FeatureSchema::label("DependencyType")),
            LayerSchema::span("Lemma").disabled(),
            LayerSchema {
                kind: LayerKind::Chain,
                ..LayerSchema::span("CoreferenceChain")
            },
        ]
    }

    #[test]
    fn test_build_skips_disabled_and_chain_layers() {
        let adapters = build_adapters(&semantic_layers()).unwrap();
        let layers: Vec<&str> = adapters.iter().map(DiffAdapter::layer).collect();
        assert_eq!(layers, vec!["NamedEntity", "SemPred", "Dependency"]);
    }

    #[test]
    fn test_disabled_features_are_not_labels() {
        let adapters = build_adapters(&semantic_layers()).unwrap();
        assert_eq!(adapters[0].label_features(), ["value"]);
    }

    #[test]
    fn test_link_features_are_declared_and_labelled() {
        let adapters = build_adapters(&semantic_layers()).unwrap();
        let pred = &adapters[1];
        assert_eq!(pred.label_features(), ["category", "arguments"]);
        let decl = pred.link_feature("arguments").unwrap();
        assert_eq!(decl.role_feature.as_deref(), Some("role"));
        assert_eq!(decl.target_feature.as_deref(), Some("target"));
    }

    #[test]
    fn test_simple_link_has_no_target_feature() {
        let layers = vec![LayerSchema::span("Chunk").with_feature(FeatureSchema::link(
            "members",
            LinkMode::Simple,
            None,
            Some("ignored"),
        ))];
        let adapters = build_adapters(&layers).unwrap();
        let decl = adapters[0].link_feature("members").unwrap();
        assert!(decl.target_feature.is_none());
    }

    #[test]
    fn test_relation_without_endpoints_rejected() {
        let mut layer = LayerSchema::relation("Dependency", "Governor", "Dependent");
        layer.target_feature = None;
        let err = build_adapters(&[layer]).unwrap_err();
        assert_eq!(
            err,
            CasDiffError::IncompleteRelationLayer {
                layer: "Dependency".to_string(),
                missing: "target".to_string(),
            }
        );
    }

    #[test]
    fn test_duplicate_enabled_layer_rejected() {
        let layers = vec![
            LayerSchema::span("NamedEntity"),
            LayerSchema::span("NamedEntity").disabled(),
            LayerSchema::span("NamedEntity"),
        ];
        assert!(matches!(
            build_adapters(&layers),
            Err(CasDiffError::DuplicateAdapter { .. })
        ));
    }
}
