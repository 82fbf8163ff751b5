//! Query building error types

use crate::db::DbError;
use crate::schema::SchemaError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum QueryError {
    /// Source path segment outside the known flag names
    #[error("Unknown source segment '{0}'")]
    UnknownSource(String),

    /// Grouping or sort on a field that does not exist
    #[error("Unknown field '{0}'")]
    UnknownField(String),

    /// Group predicate on an undefined property
    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),

    /// Index lookup failed
    #[error("Database error: {0}")]
    Database(#[from] DbError),
}

pub type Result<T> = std::result::Result<T, QueryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(
            QueryError::UnknownSource("hidden".into()).to_string(),
            "Unknown source segment 'hidden'"
        );
        assert_eq!(
            QueryError::UnknownField("colour".into()).to_string(),
            "Unknown field 'colour'"
        );
    }

    #[test]
    fn test_database_error_from_db_error() {
        let error: QueryError = DbError::RecordNotFound(3).into();
        assert!(error.to_string().contains("Database error"));
    }
}
