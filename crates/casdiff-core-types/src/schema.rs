//! Canonical schema constants for structured logging and events
//!
//! These constants ensure consistency across all logging and error reporting.

// Canonical field keys for structured logging
pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";
pub const FIELD_RUN_ID: &str = "run_id";

// Diff identifiers
pub const FIELD_PARTY: &str = "party";
pub const FIELD_DOC_INDEX: &str = "doc_index";
pub const FIELD_LAYER: &str = "layer";

// Collection sizes
pub const FIELD_PARTY_COUNT: &str = "party_count";
pub const FIELD_POSITION_COUNT: &str = "position_count";
pub const FIELD_RECORD_COUNT: &str = "record_count";

// Error fields
pub const FIELD_ERR_KIND: &str = "err_kind";
pub const FIELD_ERR_CODE: &str = "err_code";
pub const FIELD_ERR_LAYER: &str = "err_layer";
pub const FIELD_ERR_PARTY: &str = "err_party";

// Canonical event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";
