//! View parameter error types

use crate::schema::SchemaError;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParamsError {
    /// Classifier operation while not grouping at all
    #[error("No grouping is active")]
    NoGrouping,

    /// Classifier operation on a field or single-valued grouping
    #[error("Classifier path requires grouping by a multi-valued property, not '{0}'")]
    NotMultiValued(String),

    /// Value already on the classifier path
    #[error("Value '{0}' is already in the classifier path")]
    DuplicateClassifierValue(String),

    /// Value rejected by the grouping property
    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),
}

pub type Result<T> = std::result::Result<T, ParamsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(ParamsError::NoGrouping.to_string(), "No grouping is active");
        assert_eq!(
            ParamsError::DuplicateClassifierValue("rock".into()).to_string(),
            "Value 'rock' is already in the classifier path"
        );
        assert_eq!(
            ParamsError::NotMultiValued("quality".into()).to_string(),
            "Classifier path requires grouping by a multi-valued property, not 'quality'"
        );
    }
}
