//! Import command - load records from a JSON array

use super::{Context, print_json};
use crate::record::Record;
use crate::{Library, Result};
use std::fs;
use std::path::Path;

/// Execute the import command
///
/// The whole file is parsed and validated before any record is stored.
///
/// # Errors
/// Returns `CatalogError::IoError` or `CatalogError::JsonError` for an unreadable
/// file, plus the errors of [`Library::import`].
pub fn execute(library: &mut Library, file: &Path, ctx: &Context) -> Result<()> {
    let records = read_records(file)?;
    let ids = library.import(records)?;
    if ctx.json {
        return print_json(&ids);
    }
    ctx.info(&format!("Imported {} record(s) from {}", ids.len(), file.display()));
    Ok(())
}

/// Parse a JSON array of records
///
/// # Errors
/// Returns `CatalogError::IoError` or `CatalogError::JsonError`.
pub fn read_records(file: &Path) -> Result<Vec<Record>> {
    let text = fs::read_to_string(file)?;
    Ok(serde_json::from_str(&text)?)
}
