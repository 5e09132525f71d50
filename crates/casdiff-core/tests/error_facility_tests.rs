mod common;

use casdiff_core::diff::{compute_diff, CasDiff, DiffAdapter, DiffOptions, LinkCompareBehavior};
use casdiff_core::errors::{CasDiffError, ExError, ExErrorKind};
use casdiff_core::schema::{build_adapters, LayerSchema};
use common::{doc, ner_adapters, single};

#[test]
fn test_duplicate_adapter_verifiable_by_kind() {
    let err = CasDiffError::DuplicateAdapter {
        layer: "NamedEntity".to_string(),
    };

    let ex_err: ExError = err.into();

    assert_eq!(ex_err.kind(), ExErrorKind::DuplicateAdapter);
    assert_eq!(ex_err.code(), "ERR_DUPLICATE_ADAPTER");
    assert_eq!(ex_err.layer(), Some("NamedEntity"));
    assert!(ex_err.kind().is_configuration());
}

#[test]
fn test_unsupported_behavior_is_configuration_error() {
    let err = "LINK_SOMETHING"
        .parse::<LinkCompareBehavior>()
        .unwrap_err();
    assert_eq!(
        err,
        CasDiffError::UnsupportedLinkCompareBehavior {
            mode: "LINK_SOMETHING".to_string()
        }
    );
    assert!(err.to_string().contains("[LINK_SOMETHING]"));

    let ex_err: ExError = err.into();
    assert_eq!(ex_err.kind(), ExErrorKind::Configuration);
    assert_eq!(ex_err.code(), "ERR_CONFIGURATION");
}

#[test]
fn test_lookup_errors_carry_party() {
    let ex_err: ExError = CasDiffError::DocumentNotFound {
        party: "alice".to_string(),
        doc_index: 3,
    }
    .into();
    assert_eq!(ex_err.kind(), ExErrorKind::NotFound);
    assert_eq!(ex_err.party(), Some("alice"));
    assert!(ex_err.message().contains('3'));

    let ex_err: ExError = CasDiffError::UnknownAddress {
        party: "bob".to_string(),
        doc_index: 0,
        addr: 17,
    }
    .into();
    assert_eq!(ex_err.kind(), ExErrorKind::NotFound);
    assert_eq!(ex_err.party(), Some("bob"));
    assert!(!ex_err.kind().is_configuration());
}

#[test]
fn test_error_kind_code_mapping() {
    let kinds = vec![
        (ExErrorKind::Configuration, "ERR_CONFIGURATION"),
        (ExErrorKind::DuplicateAdapter, "ERR_DUPLICATE_ADAPTER"),
        (ExErrorKind::InvalidScope, "ERR_INVALID_SCOPE"),
        (ExErrorKind::InvalidInput, "ERR_INVALID_INPUT"),
        (ExErrorKind::NotFound, "ERR_NOT_FOUND"),
        (ExErrorKind::Serialization, "ERR_SERIALIZATION"),
    ];

    for (kind, expected_code) in kinds {
        assert_eq!(kind.code(), expected_code);
    }
}

// ---------------------------------------------------------------------------
// Errors surfaced by operations
// ---------------------------------------------------------------------------

#[test]
fn test_compute_rejects_duplicate_adapters() {
    let adapters = vec![
        DiffAdapter::span("NamedEntity", ["value"]),
        DiffAdapter::span("NamedEntity", ["identifier"]),
    ];
    let documents = single(vec![("A", doc())]);

    let err = compute_diff(adapters, LinkCompareBehavior::default(), &documents, None).unwrap_err();

    assert_eq!(
        err,
        CasDiffError::DuplicateAdapter {
            layer: "NamedEntity".to_string()
        }
    );
}

#[test]
fn test_compute_rejects_inverted_scope() {
    let documents = single(vec![("A", doc())]);

    let err = CasDiff::compute(
        ner_adapters(),
        DiffOptions::default().with_scope(10, 2),
        &documents,
    )
    .err()
    .unwrap();

    assert_eq!(err, CasDiffError::InvalidScope { begin: 10, end: 2 });
    assert_eq!(ExError::from(err).code(), "ERR_INVALID_SCOPE");
}

#[test]
fn test_builder_rejects_relation_without_endpoints() {
    let mut layer = LayerSchema::span("Dependency");
    layer.kind = casdiff_core::schema::LayerKind::Relation;
    layer.source_feature = Some("Governor".to_string());

    let err = build_adapters(&[layer]).unwrap_err();

    assert_eq!(
        err,
        CasDiffError::IncompleteRelationLayer {
            layer: "Dependency".to_string(),
            missing: "target".to_string()
        }
    );
}

#[test]
fn test_set_feature_on_foreign_address_is_invalid_input() {
    let mut d = doc();
    let err = d
        .set_feature(casdiff_core::Addr::new(99), "value", "PER")
        .unwrap_err();

    assert!(matches!(err, CasDiffError::InvalidInput { .. }));
    assert_eq!(ExError::from(err).kind(), ExErrorKind::InvalidInput);
}
