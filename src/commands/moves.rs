//! Moves command - list moved-file candidates or resolve one move

use super::{Context, print_json};
use crate::output;
use crate::record::RecordId;
use crate::{Library, Result};
use serde::Serialize;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct MoveEntry<'a> {
    record_id: RecordId,
    move_group_id: Option<&'a str>,
    destinations: &'a [crate::moves::MoveDestination],
}

/// Execute the moves command
///
/// # Errors
/// Returns `CatalogError::InvalidInput` when `to` is not a candidate of `from`,
/// or `CatalogError::DbError` on store failures.
pub fn execute(
    library: &mut Library,
    apply: Option<(RecordId, RecordId)>,
    ctx: &Context,
) -> Result<()> {
    if let Some((from, to)) = apply {
        library.apply_move(from, to)?;
        ctx.info(&format!("Record {from} now points at the file of record {to}"));
        return Ok(());
    }

    let index = library.move_index()?;
    if ctx.json {
        let entries: Vec<MoveEntry<'_>> = index
            .all()
            .iter()
            .map(|(id, destinations)| MoveEntry {
                record_id: *id,
                move_group_id: index.move_group_id(*id),
                destinations,
            })
            .collect();
        return print_json(&entries);
    }

    if index.is_empty() {
        ctx.info("No moved files detected.");
        return Ok(());
    }
    for (id, destinations) in index.all() {
        for line in output::move_lines(*id, index.move_group_id(*id), destinations) {
            println!("{line}");
        }
    }
    Ok(())
}
