//! View error types

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ViewError {
    /// A multi-column field where a single column is expected
    #[error("Invalid argument: {0}")]
    ArgumentError(String),

    /// Sort or column on a field that does not exist
    #[error("Unknown field '{0}'")]
    UnknownField(String),
}

pub type Result<T> = std::result::Result<T, ViewError>;
