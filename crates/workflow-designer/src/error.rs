//! Error types for the workflow designer
//!
//! Most designer operations are total: invalid references degrade to no-ops
//! or absent results. The variants here cover the few operations that have
//! no sensible default.

use thiserror::Error;

/// Result type alias using DesignerError
pub type Result<T> = std::result::Result<T, DesignerError>;

/// Errors that can occur in the workflow designer
#[derive(Debug, Error)]
pub enum DesignerError {
    /// A node type name is not one of the recognized types
    #[error("Unknown node type: {0}")]
    UnknownNodeType(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
