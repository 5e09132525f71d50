//! Multi-party annotation diff.
//!
//! Compares the annotations several parties made on the same documents and
//! reports, per position, which distinct values were observed and by whom.
//!
//! ## Entry point
//!
//! ```
//! use casdiff_core::cas::DocumentState;
//! use casdiff_core::casdiff_core_types::PartyId;
//! use casdiff_core::diff::{compute_diff, render_dump, DiffAdapter, DocumentMap, LinkCompareBehavior};
//!
//! let mut documents = DocumentMap::new();
//! for (party, value) in [("alice", "PER"), ("bob", "ORG")] {
//!     let mut doc = DocumentState::new("John met Mary");
//!     let ne = doc.add_annotation("NamedEntity", 0, 4);
//!     doc.set_feature(ne, "value", value).unwrap();
//!     documents.insert(PartyId::from(party), vec![Some(doc)]);
//! }
//!
//! let adapters = vec![DiffAdapter::span("NamedEntity", ["value"])];
//! let result = compute_diff(adapters, LinkCompareBehavior::default(), &documents, None).unwrap();
//! assert!(result.has_differences());
//! println!("{}", render_dump(&result));
//! ```
//!
//! ## Guarantees
//!
//! - **Party-agnostic positions**: a position never encodes who annotated it.
//! - **Bounded recursion**: annotation-valued features are compared by
//!   location only.
//! - **Determinism**: positions are ordered; equal inputs give equal
//!   fingerprints.
//! - **Read-only**: document states are never modified.

pub mod adapter;
pub mod configuration;
pub mod digest;
pub mod dump;
pub mod engine;
pub mod position;
pub mod result;

pub use adapter::{DiffAdapter, LinkFeatureDecl, RelationDiffAdapter, SpanDiffAdapter};
pub use configuration::{Aid, Configuration, ConfigurationSet, SlotRef};
pub use digest::compute_result_digest;
pub use dump::render_dump;
pub use engine::{
    compute_diff, compute_diff_single, compute_diff_with_config, CasDiff, DiffOptions,
    DocumentMap,
};
pub use position::{Anchor, LinkCompareBehavior, LinkKey, LinkSlot, Position};
pub use result::{DiffResult, DiffStats};
