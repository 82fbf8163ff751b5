//! Property catalog error types
//!
//! Every catalog operation validates its input completely before touching any
//! state, so an error always means nothing was changed.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SchemaError {
    /// Bad enumeration, default or name at definition time
    #[error("Invalid definition for property '{0}': {1}")]
    InvalidDefinition(String, String),

    /// A property with this name already exists
    #[error("Property '{0}' already exists")]
    DuplicateTag(String),

    /// No property with this name
    #[error("Property '{0}' not found in catalog")]
    UnknownTag(String),

    /// A value failed the kind or enumeration check
    #[error("Invalid value '{value}' for property '{tag}': {reason}")]
    InvalidTagValue {
        tag: String,
        value: String,
        reason: String,
    },
}

/// Type alias for cleaner function signatures
pub type Result<T> = std::result::Result<T, SchemaError>;
