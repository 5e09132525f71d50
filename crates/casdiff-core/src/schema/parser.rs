//! Diff configuration parser with validation
//!
//! Parses YAML or JSON and validates layer declarations

use crate::errors::{CasDiffError, Result};
use crate::schema::builder::validate_layers;
use crate::schema::model::DiffConfig;

/// Parse a diff configuration from YAML text
///
/// # Errors
///
/// Returns [`CasDiffError::InvalidConfig`] if the text is not a YAML
/// `DiffConfig`, or any layer declaration error of [`validate_layers`].
pub fn parse_config_str(content: &str) -> Result<DiffConfig> {
    let config: DiffConfig = serde_yaml::from_str(content).map_err(|e| CasDiffError::InvalidConfig {
        reason: format!("YAML parse error: {}", e),
    })?;

    validate_layers(&config.layers)?;

    Ok(config)
}

/// Parse a diff configuration from JSON text
///
/// # Errors
///
/// Returns [`CasDiffError::InvalidConfig`] if the text is not a JSON
/// `DiffConfig`, or any layer declaration error of [`validate_layers`].
pub fn parse_config_json(content: &str) -> Result<DiffConfig> {
    let config: DiffConfig = serde_json::from_str(content).map_err(|e| CasDiffError::InvalidConfig {
        reason: format!("JSON parse error: {}", e),
    })?;

    validate_layers(&config.layers)?;

    Ok(config)
}
