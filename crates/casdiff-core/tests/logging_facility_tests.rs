#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use casdiff_core::diff::{compute_diff, DiffAdapter, LinkCompareBehavior};
use casdiff_core::errors::CasDiffError;
use casdiff_core::logging_facility::test_capture::init_test_capture;
use casdiff_core::{log_op_end, log_op_error, log_op_start};
use casdiff_core_types::schema::{
    EVENT_END, EVENT_END_ERROR, EVENT_START, FIELD_DOC_INDEX, FIELD_DURATION_MS, FIELD_ERR_CODE,
    FIELD_ERR_KIND, FIELD_ERR_LAYER, FIELD_ERR_PARTY, FIELD_LAYER, FIELD_PARTY, FIELD_PARTY_COUNT,
    FIELD_POSITION_COUNT, FIELD_RECORD_COUNT, FIELD_RUN_ID,
};
use common::{doc, entity, ner_adapters, single};
use tracing::Level;

#[test]
fn test_log_op_start_macro() {
    let capture = init_test_capture();
    let op_name = "test_log_op_start_unique_1";

    log_op_start!(op_name);

    let start_events = capture.count_events(|e| {
        e.op.as_deref() == Some(op_name) && e.event.as_deref() == Some(EVENT_START)
    });
    assert_eq!(start_events, 1);
}

#[test]
fn test_log_op_end_macro() {
    let capture = init_test_capture();
    let op_name = "test_log_op_end_unique_2";

    log_op_end!(op_name, duration_ms = 42);

    let events = capture.events_for_op(op_name);
    assert_eq!(events.len(), 1, "Should have exactly one end event");
    assert_eq!(events[0].event.as_deref(), Some(EVENT_END));
    assert_eq!(events[0].field(FIELD_DURATION_MS), Some("42"));
}

#[test]
fn test_log_op_error_includes_code() {
    let capture = init_test_capture();
    let op_name = "test_log_op_error_unique_3";

    let err = CasDiffError::InvalidScope { begin: 9, end: 2 };
    log_op_error!(op_name, err, duration_ms = 10);

    let events = capture.events_for_op(op_name);
    assert_eq!(events.len(), 1, "Should have exactly one error event");
    assert_eq!(events[0].level, Level::ERROR);
    assert_eq!(events[0].event.as_deref(), Some(EVENT_END_ERROR));
    assert_eq!(events[0].field(FIELD_ERR_CODE), Some("ERR_INVALID_SCOPE"));
    assert_eq!(events[0].field(FIELD_ERR_KIND), Some("InvalidScope"));
    assert_eq!(events[0].field(FIELD_ERR_LAYER), Some(""));
}

#[test]
fn test_start_macro_carries_extra_fields() {
    let capture = init_test_capture();
    let op_name = "test_start_fields_unique_4";

    log_op_start!(op_name, party_count = 3usize, layer = "NamedEntity");

    let events = capture.events_for_op(op_name);
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].field(FIELD_PARTY_COUNT), Some("3"));
    assert_eq!(events[0].field(FIELD_LAYER), Some("NamedEntity"));
}

// ---------------------------------------------------------------------------
// compute_diff boundary events
// ---------------------------------------------------------------------------

#[test]
fn test_compute_diff_logs_start_and_end_once() {
    let capture = init_test_capture();

    let mut a = doc();
    entity(&mut a, 0, 4, "PER");
    let documents = single(vec![("LogStartEnd", a)]);
    compute_diff(ner_adapters(), LinkCompareBehavior::default(), &documents, None).unwrap();

    let ends: Vec<_> = capture
        .events_for_op("compute_diff")
        .into_iter()
        .filter(|e| e.event.as_deref() == Some(EVENT_END))
        .filter(|e| e.field(FIELD_POSITION_COUNT) == Some("1"))
        .collect();
    assert!(!ends.is_empty());

    // Every end event pairs with a start event of the same run
    let run_id = ends[0].field(FIELD_RUN_ID).unwrap().to_string();
    let for_run = |event: &str| {
        capture.count_events(|e| {
            e.op.as_deref() == Some("compute_diff")
                && e.event.as_deref() == Some(event)
                && e.field(FIELD_RUN_ID) == Some(run_id.as_str())
        })
    };
    assert_eq!(for_run(EVENT_START), 1);
    assert_eq!(for_run(EVENT_END), 1);
    assert_eq!(for_run(EVENT_END_ERROR), 0);
}

#[test]
fn test_compute_diff_logs_error_event_with_code() {
    let capture = init_test_capture();

    let adapters = vec![
        DiffAdapter::span("Duplicated", ["value"]),
        DiffAdapter::span("Duplicated", ["value"]),
    ];
    let err = compute_diff(
        adapters,
        LinkCompareBehavior::default(),
        &single(vec![("LogError", doc())]),
        None,
    )
    .unwrap_err();
    assert!(matches!(err, CasDiffError::DuplicateAdapter { .. }));

    let errors = capture.count_events(|e| {
        e.op.as_deref() == Some("compute_diff")
            && e.event.as_deref() == Some(EVENT_END_ERROR)
            && e.field(FIELD_ERR_CODE) == Some("ERR_DUPLICATE_ADAPTER")
            && e.field(FIELD_ERR_LAYER) == Some("Duplicated")
            && e.field(FIELD_ERR_PARTY) == Some("")
    });
    assert!(errors >= 1);
}

#[test]
fn test_unregistered_target_layer_is_warned() {
    let capture = init_test_capture();

    // Argument targets live on a layer without an adapter
    let build = || {
        let mut d = doc();
        let target = d.add_annotation("UnregisteredTargetLayer", 0, 4);
        let host = d.add_annotation("Event", 5, 8);
        let link = d.add_structure("EventArgument");
        d.set_feature(link, "role", "agent").unwrap();
        d.set_feature(link, "target", target).unwrap();
        d.set_feature(host, "arguments", vec![link]).unwrap();
        d
    };
    let adapters = vec![DiffAdapter::span("Event", Vec::<String>::new()).with_link_feature(
        "arguments",
        Some("role"),
        Some("target"),
    )];
    let documents = single(vec![("A", build()), ("B", build())]);

    let result =
        compute_diff(adapters, LinkCompareBehavior::default(), &documents, None).unwrap();

    assert!(!result.has_differences());
    assert!(capture.has_message(Level::WARN, "No diff adapter for layer"));
}

#[test]
fn test_ingestion_events_use_canonical_fields() {
    let capture = init_test_capture();

    let mut a = doc();
    entity(&mut a, 0, 4, "PER");
    entity(&mut a, 9, 13, "PER");
    let documents = single(vec![("CanonicalFields", a)]);
    compute_diff(ner_adapters(), LinkCompareBehavior::default(), &documents, None).unwrap();

    let ingested: Vec<_> = capture
        .events()
        .into_iter()
        .filter(|e| e.field(FIELD_PARTY) == Some("CanonicalFields"))
        .filter(|e| e.message.as_deref() == Some("Ingested layer"))
        .collect();
    assert_eq!(ingested.len(), 1);
    assert_eq!(ingested[0].level, Level::DEBUG);
    assert_eq!(ingested[0].field(FIELD_DOC_INDEX), Some("0"));
    assert_eq!(ingested[0].field(FIELD_LAYER), Some("NamedEntity"));
    assert_eq!(ingested[0].field(FIELD_RECORD_COUNT), Some("2"));
}

#[test]
fn test_value_kind_mismatch_is_traced() {
    let capture = init_test_capture();

    let mut a = doc();
    let ne = a.add_annotation("NamedEntity", 0, 4);
    a.set_feature(ne, "value", "PER").unwrap();
    let mut b = doc();
    let ne = b.add_annotation("NamedEntity", 0, 4);
    b.set_feature(ne, "value", 7).unwrap();
    let documents = single(vec![("KindA", a), ("KindB", b)]);

    let result =
        compute_diff(ner_adapters(), LinkCompareBehavior::default(), &documents, None).unwrap();

    assert!(result.has_differences());
    let mismatches = capture.count_events(|e| {
        e.level == Level::TRACE
            && e.message.as_deref() == Some("Feature value kinds differ")
            && e.field("left") == Some("string")
            && e.field("right") == Some("int")
    });
    assert!(mismatches >= 1);
}
