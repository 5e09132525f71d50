//! casdiff Core - Multi-party annotation agreement engine
//!
//! This crate compares the annotations several parties made independently
//! on the same documents, including:
//! - An arena-addressed in-memory document model
//! - Party-agnostic positions and per-layer adapters
//! - Structural equality bounded at annotation-valued features
//! - Configuration sets with stacking bookkeeping
//! - An immutable, thread-shareable diff result with agreement and
//!   completeness queries, statistics and a fingerprint
//! - Layer schema declarations loadable from YAML or JSON

pub mod cas;
pub mod diff;
pub mod errors;
pub mod logging_facility;
pub mod schema;

pub use casdiff_core_types;

// Re-export commonly used types
pub use cas::{Addr, DocumentState, FeatureStructure, FeatureValue, Span};
pub use casdiff_core_types::{DiffRunId, PartyId};
pub use diff::{
    compute_diff, compute_diff_single, compute_diff_with_config, render_dump, CasDiff,
    Configuration, ConfigurationSet, DiffAdapter, DiffOptions, DiffResult, DiffStats,
    DocumentMap, LinkCompareBehavior, Position,
};
pub use errors::{CasDiffError, ExError, ExErrorKind, Result};
pub use schema::{build_adapters, parse_config_json, parse_config_str, DiffConfig};
