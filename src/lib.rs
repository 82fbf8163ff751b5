//! Mediacat - a media catalog with layered views
//!
//! Records describe video files and carry values for user-defined properties.
//! A view narrows the catalog through six layers (sources, grouping,
//! classifier path, group, search, sort) and returns one page of records
//! together with selection statistics.
//!
//! [`library::Library`] is the entry point tying the store, the property
//! catalog and the view caches together.

use thiserror::Error;

pub mod cli;
pub mod commands;
pub mod config;
pub mod db;
pub mod grouping;
pub mod library;
pub mod moves;
pub mod output;
pub mod params;
pub mod query;
pub mod record;
pub mod schema;
pub mod search;
pub mod view;

#[cfg(test)]
pub mod testing;

pub use library::Library;

/// Error enum, contains all failure states of the program
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Database error: {0}")]
    DbError(#[from] db::DbError),
    #[error(transparent)]
    SchemaError(#[from] schema::SchemaError),
    #[error("Query error: {0}")]
    QueryError(#[from] query::QueryError),
    #[error("View error: {0}")]
    ViewError(#[from] view::ViewError),
    #[error("Parameter error: {0}")]
    ParamsError(#[from] params::ParamsError),
    #[error("Configuration error: {0}")]
    ConfigError(#[from] ::config::ConfigError),
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

pub type Result<T> = std::result::Result<T, CatalogError>;
