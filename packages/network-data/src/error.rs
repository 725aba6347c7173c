//! Error types for network-data conversions.
//!
//! Provides unified error handling across the crate.

use thiserror::Error;

/// Main error type for network-data operations.
#[derive(Debug, Error)]
pub enum NetworkDataError {
    /// IO error while reading an input file
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed XML in a GraphML document
    #[error("XML error: {0}")]
    Xml(#[from] roxmltree::Error),

    /// Structurally invalid GraphML (missing elements, undeclared keys,
    /// values that do not parse under their declared type)
    #[error("GraphML parse error: {0}")]
    Parse(String),

    /// Attribute type outside the recognized GraphML set
    #[error("unsupported attribute type: {0:?}")]
    UnsupportedAttributeType(String),

    /// Attribute or mapped column collides with an existing or reserved
    /// column
    #[error("schema conflict: {0}")]
    SchemaConflict(String),

    /// Store-level error, propagated opaquely
    #[error("SQLite error: {0}")]
    Database(#[from] rusqlite::Error),
}

impl NetworkDataError {
    /// Create a parse error.
    pub fn parse(msg: impl Into<String>) -> Self {
        NetworkDataError::Parse(msg.into())
    }

    /// Create a schema-conflict error.
    pub fn schema_conflict(msg: impl Into<String>) -> Self {
        NetworkDataError::SchemaConflict(msg.into())
    }
}

/// Result type alias for network-data operations.
pub type Result<T> = std::result::Result<T, NetworkDataError>;
