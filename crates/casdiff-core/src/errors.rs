use thiserror::Error;

/// Result type alias using CasDiffError
pub type Result<T> = std::result::Result<T, CasDiffError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// This taxonomy provides a stable, structured classification of all errors
/// raised by the diff engine. Each kind maps to a stable error code that can
/// be used for programmatic error handling, testing, and log assertions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Configuration (caller bugs, fatal)
    Configuration,
    DuplicateAdapter,
    InvalidScope,

    // Input
    InvalidInput,
    NotFound,

    // Integration
    Serialization,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::Configuration => "ERR_CONFIGURATION",
            ExErrorKind::DuplicateAdapter => "ERR_DUPLICATE_ADAPTER",
            ExErrorKind::InvalidScope => "ERR_INVALID_SCOPE",
            ExErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            ExErrorKind::NotFound => "ERR_NOT_FOUND",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
        }
    }

    /// Whether errors of this kind are caller configuration bugs
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            ExErrorKind::Configuration | ExErrorKind::DuplicateAdapter | ExErrorKind::InvalidScope
        )
    }
}

/// Canonical structured error type
///
/// This error type provides a structured representation of errors with
/// classification fields for programmatic handling and rich context for debugging.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    layer: Option<String>,
    party: Option<String>,
    message: String,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            layer: None,
            party: None,
            message: String::new(),
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add layer type context
    pub fn with_layer(mut self, layer: impl Into<String>) -> Self {
        self.layer = Some(layer.into());
        self
    }

    /// Add party context
    pub fn with_party(mut self, party: impl Into<String>) -> Self {
        self.party = Some(party.into());
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Get the operation context, if any
    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    /// Get the layer context, if any
    pub fn layer(&self) -> Option<&str> {
        self.layer.as_deref()
    }

    /// Get the party context, if any
    pub fn party(&self) -> Option<&str> {
        self.party.as_deref()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(layer) = &self.layer {
            write!(f, " (layer: {})", layer)?;
        }
        if let Some(party) = &self.party {
            write!(f, " (party: {})", party)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {}

// ========== End Error Facility ==========

/// Error taxonomy for diff operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CasDiffError {
    // ===== Configuration Errors =====
    /// Link comparison mode is not one of the supported modes
    #[error("Unknown link target comparison mode [{mode}]")]
    UnsupportedLinkCompareBehavior { mode: String },

    /// Link mode of a feature declaration is not supported
    #[error("Unknown link mode [{mode}] for feature {feature}")]
    UnknownLinkMode { feature: String, mode: String },

    /// More than one adapter registered for the same layer
    #[error("Duplicate diff adapter for layer {layer}")]
    DuplicateAdapter { layer: String },

    /// Relation layer declared without source/target features
    #[error("Relation layer {layer} must declare {missing} feature")]
    IncompleteRelationLayer { layer: String, missing: String },

    /// Diff scope has begin after end
    #[error("Invalid diff scope: begin {begin} is after end {end}")]
    InvalidScope { begin: usize, end: usize },

    /// Configuration text could not be parsed
    #[error("Invalid diff configuration: {reason}")]
    InvalidConfig { reason: String },

    // ===== Input Errors =====
    /// Caller-supplied input is malformed
    #[error("Invalid input: {reason}")]
    InvalidInput { reason: String },

    // ===== Lookup Errors =====
    /// Party has no document slot at the given index
    #[error("Party {party} has no document at index {doc_index}")]
    DocumentNotFound { party: String, doc_index: usize },

    /// Address does not resolve inside the document state
    #[error("Address {addr} not found in document {doc_index} of party {party}")]
    UnknownAddress {
        party: String,
        doc_index: usize,
        addr: usize,
    },

    // ===== Generic Errors =====
    /// Serialization error (JSON encoding/decoding)
    #[error("Serialization error: {message}")]
    Serialization { message: String },
}

/// Conversion from CasDiffError to ExError
impl From<CasDiffError> for ExError {
    fn from(err: CasDiffError) -> Self {
        match err {
            CasDiffError::UnsupportedLinkCompareBehavior { mode } => {
                ExError::new(ExErrorKind::Configuration)
                    .with_message(format!("Unknown link target comparison mode [{}]", mode))
            }
            CasDiffError::UnknownLinkMode { feature, mode } => {
                ExError::new(ExErrorKind::Configuration)
                    .with_message(format!("Unknown link mode [{}] for feature {}", mode, feature))
            }
            CasDiffError::DuplicateAdapter { layer } => ExError::new(ExErrorKind::DuplicateAdapter)
                .with_layer(layer)
                .with_message("Duplicate diff adapter"),
            CasDiffError::IncompleteRelationLayer { layer, missing } => {
                ExError::new(ExErrorKind::Configuration)
                    .with_layer(layer)
                    .with_message(format!("Relation layer must declare {} feature", missing))
            }
            CasDiffError::InvalidScope { begin, end } => ExError::new(ExErrorKind::InvalidScope)
                .with_message(format!("begin {} is after end {}", begin, end)),
            CasDiffError::InvalidConfig { reason } => ExError::new(ExErrorKind::Configuration)
                .with_message(format!("Invalid diff configuration: {}", reason)),
            CasDiffError::InvalidInput { reason } => {
                ExError::new(ExErrorKind::InvalidInput).with_message(reason)
            }
            CasDiffError::DocumentNotFound { party, doc_index } => {
                ExError::new(ExErrorKind::NotFound)
                    .with_party(party)
                    .with_message(format!("No document at index {}", doc_index))
            }
            CasDiffError::UnknownAddress {
                party,
                doc_index,
                addr,
            } => ExError::new(ExErrorKind::NotFound)
                .with_party(party)
                .with_message(format!(
                    "Address {} not found in document {}",
                    addr, doc_index
                )),
            CasDiffError::Serialization { message } => {
                ExError::new(ExErrorKind::Serialization).with_message(message)
            }
        }
    }
}

impl From<serde_json::Error> for CasDiffError {
    fn from(err: serde_json::Error) -> Self {
        CasDiffError::Serialization {
            message: err.to_string(),
        }
    }
}
