//! Command implementations
//!
//! Each command is a module with an execute function that takes parsed CLI args
//! and runs the operation against a [`Library`].

pub mod column;
pub mod import;
pub mod moves;
pub mod property;
pub mod tag;
pub mod view;

pub use column::execute as column;
pub use import::execute as import;
pub use moves::execute as moves;
pub use property::execute as property;
pub use tag::execute as tag;
pub use view::execute as view;

use crate::config::MediacatConfig;
use crate::{Library, Result};
use serde::Serialize;

/// Settings shared by every command
#[derive(Debug, Clone)]
pub struct Context {
    pub config: MediacatConfig,
    pub quiet: bool,
    pub json: bool,
}

impl Context {
    /// Open the named database, or the configured default
    ///
    /// # Errors
    /// Returns `CatalogError::ConfigError` for an unknown database name, or
    /// `CatalogError::DbError` if the store cannot be opened.
    pub fn open_library(&self, db: Option<&str>) -> Result<Library> {
        let path = self.config.resolve_database(db)?;
        tracing::debug!(path = %path.display(), "opening database");
        Library::with_params(crate::db::Database::open(path)?, self.config.view_parameters())
    }

    /// Print an informational line unless quiet or emitting JSON
    pub fn info(&self, message: &str) {
        if !self.quiet && !self.json {
            println!("{message}");
        }
    }
}

/// Print a value as pretty JSON on stdout
///
/// # Errors
/// Returns `CatalogError::JsonError` if serialization fails.
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
