//! Core types shared across casdiff facilities
//!
//! This crate provides foundational types used by the diff engine,
//! its error handling and its logging facility:
//!
//! - **Party identity**: PartyId
//! - **Correlation types**: DiffRunId
//! - **Schema constants**: Canonical field keys and event names

pub mod correlation;
pub mod party;
pub mod schema;

pub use correlation::DiffRunId;
pub use party::PartyId;
