//! Database-specific error types
//!
//! This module defines all error types that can occur during store operations.
//!
//! # Error Types
//!
//! - **`SledError`**: Errors from the underlying sled embedded database
//! - **`DecodeError`** / **`EncodeError`**: bincode failures on stored values
//! - **`RecordNotFound`**: An identifier that is not in the store
//! - **`Schema`**: A catalog change the stored records cannot satisfy
//!
//! I/O failures are never retried; they propagate to the caller unchanged.

use crate::record::RecordId;
use crate::schema::SchemaError;
use thiserror::Error;

/// Database-specific errors
#[derive(Debug, Error)]
pub enum DbError {
    /// Represents a sled database error
    #[error("Database error: {0}")]
    SledError(#[from] sled::Error),

    /// Represents a bincode decoding error
    #[error("Error while decoding data: {0}")]
    DecodeError(#[from] bincode::error::DecodeError),

    /// Represents a bincode encoding error
    #[error("Error while encoding data: {0}")]
    EncodeError(#[from] bincode::error::EncodeError),

    /// No record with this identifier
    #[error("Record not found: {0}")]
    RecordNotFound(RecordId),

    /// Stored records conflict with a property change
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// Invalid input provided by the caller
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Type alias for cleaner function signatures
pub type Result<T> = std::result::Result<T, DbError>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod error_tests;
