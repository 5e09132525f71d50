//! Layer schema and diff configuration
//!
//! Provides:
//! - Layer and feature declarations
//! - Adapter building from declarations
//! - YAML/JSON configuration parser with validation

pub mod builder;
pub mod model;
pub mod parser;

pub use builder::{build_adapters, validate_layers};
pub use model::{DiffConfig, FeatureSchema, LayerKind, LayerSchema, LinkMode};
pub use parser::{parse_config_json, parse_config_str};
