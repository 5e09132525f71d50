//! In-memory annotated document model.
//!
//! A [`DocumentState`] is one party's view of one document: the text plus an
//! arena of feature structures addressed by [`Addr`]. Addresses are plain
//! indices scoped to their document, so diff results can hold on to them
//! after the documents are gone.

pub mod document;
pub mod value;

pub use document::{Addr, DocumentState, FeatureStructure, Span};
pub use value::FeatureValue;
