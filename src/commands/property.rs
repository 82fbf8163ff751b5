//! Property command - manage property definitions

use super::{Context, print_json};
use crate::cli::PropertyCommands;
use crate::output;
use crate::schema::PropertyKind;
use crate::{CatalogError, Library, Result};
use serde_json::json;

/// Execute a property subcommand
///
/// # Errors
/// Returns `CatalogError::SchemaError` for rejected catalog changes, or
/// `CatalogError::InvalidInput` for an unknown kind.
pub fn execute(library: &mut Library, command: &PropertyCommands, ctx: &Context) -> Result<()> {
    match command {
        PropertyCommands::Define {
            name,
            kind,
            multiple,
            enumeration,
            default,
        } => {
            let kind = kind.parse::<PropertyKind>().map_err(CatalogError::InvalidInput)?;
            let enumeration = if enumeration.is_empty() {
                None
            } else {
                Some(parse_values(kind, enumeration)?)
            };
            let default = default
                .as_deref()
                .map(|text| parse_value(kind, text))
                .transpose()?;
            library.define_property(name, kind, *multiple, enumeration, default)?;
            ctx.info(&format!("Defined property '{name}'"));
        }
        PropertyCommands::Rename { old, new } => {
            library.rename_property(old, new)?;
            ctx.info(&format!("Renamed property '{old}' to '{new}'"));
        }
        PropertyCommands::Remove { name } => {
            library.remove_property(name)?;
            ctx.info(&format!("Removed property '{name}'"));
        }
        PropertyCommands::Multiple { name, multiple } => {
            library.set_multiplicity(name, *multiple)?;
            let label = if *multiple { "multi-valued" } else { "single-valued" };
            ctx.info(&format!("Property '{name}' is now {label}"));
        }
        PropertyCommands::List => {
            let properties = library.catalog().describe_all();
            if ctx.json {
                return print_json(properties);
            }
            if properties.is_empty() {
                ctx.info("No properties defined.");
            }
            for property in properties {
                println!("{}", output::property_line(property, ctx.quiet));
            }
        }
        PropertyCommands::Describe { name } => {
            let description = library.catalog().describe(name)?;
            let counts = library.db().property_values(name)?;
            if ctx.json {
                let values: Vec<_> = counts
                    .iter()
                    .map(|(value, count)| json!({ "value": value, "count": count }))
                    .collect();
                return print_json(&json!({ "property": description, "values": values }));
            }
            println!("{}", output::property_line(&description, ctx.quiet));
            for (value, count) in counts {
                println!("    {value} ({count} record(s))");
            }
        }
    }
    Ok(())
}

fn parse_value(kind: PropertyKind, text: &str) -> Result<crate::schema::PropertyValue> {
    kind.parse_value(text)
        .ok_or_else(|| CatalogError::InvalidInput(format!("'{text}' is not a valid {kind}")))
}

fn parse_values(kind: PropertyKind, texts: &[String]) -> Result<Vec<crate::schema::PropertyValue>> {
    texts.iter().map(|text| parse_value(kind, text)).collect()
}
