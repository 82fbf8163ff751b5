//! Tag command - set property values on records

use super::{Context, print_json};
use crate::record::RecordId;
use crate::{Library, Result};

/// Execute the tag command
///
/// Values are parsed with the property's kind; an empty list clears it.
///
/// # Errors
/// Returns `CatalogError::SchemaError` for an unknown property or invalid
/// values, or `CatalogError::DbError` for an unknown record.
pub fn execute(
    library: &mut Library,
    property: &str,
    values: &[String],
    ids: &[RecordId],
    ctx: &Context,
) -> Result<()> {
    let values = library.catalog().parse(property, values)?;
    let count = library.set_tag(ids, property, values)?;
    if ctx.json {
        return print_json(&serde_json::json!({ "property": property, "updated": count }));
    }
    ctx.info(&format!("Updated '{property}' on {count} record(s)"));
    Ok(())
}
