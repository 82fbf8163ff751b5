//! Column command - print one field of every selected record

use super::{Context, print_json, view};
use crate::cli::ViewArgs;
use crate::query::QueryError;
use crate::record::Field;
use crate::view::PageRequest;
use crate::{Library, Result};

/// Execute the column command
///
/// # Errors
/// Returns `CatalogError::QueryError` for an unknown field,
/// `CatalogError::ViewError` for a multi-column field, plus the errors of
/// [`view::apply_args`].
pub fn execute(library: &mut Library, field: &str, args: &ViewArgs, ctx: &Context) -> Result<()> {
    let field = Field::parse(field).ok_or_else(|| QueryError::UnknownField(field.to_string()))?;
    view::apply_args(library, args)?;
    let request = PageRequest {
        selector: view::selector(args),
        ..PageRequest::default()
    };

    let values = library.column(&request, field)?;
    if ctx.json {
        return print_json(&values);
    }
    for value in values {
        println!("{value}");
    }
    Ok(())
}
