//! Output formatting for CLI display
//!
//! Human-readable lines for records, groups, properties and move candidates.
//! Sizes go through `byte-unit`, missing files are highlighted with `colored`.

use crate::grouping::GroupSummary;
use crate::moves::MoveDestination;
use crate::record::{FieldValue, FileSize, Record, RecordId};
use crate::schema::PropertyDescription;
use crate::view::ViewResult;
use colored::Colorize;
use std::path::Path;

/// Color a path by whether its file was found (green) or is missing (red)
#[must_use]
pub fn colorize_path(path: &Path, found: bool) -> String {
    let formatted = path.display().to_string();
    if found {
        formatted.green().to_string()
    } else {
        formatted.red().to_string()
    }
}

/// Format a record for display
///
/// Quiet mode prints the bare path.
#[must_use]
pub fn record_line(record: &Record, quiet: bool) -> String {
    if quiet {
        return record.path.display().to_string();
    }
    let tags: Vec<String> = record
        .properties
        .iter()
        .map(|(name, values)| {
            let values: Vec<String> = values.iter().map(ToString::to_string).collect();
            format!("{name}={}", values.join("|"))
        })
        .collect();
    let mut line = format!(
        "  {:>6} {} ({}, {})",
        record.id.to_string().dimmed(),
        colorize_path(&record.path, record.flags.found),
        FileSize(record.size),
        FieldValue::Length(record.length_seconds()),
    );
    if !tags.is_empty() {
        line.push_str(&format!(" [{}]", tags.join(", ")));
    }
    line
}

/// Statistics line of a view page
#[must_use]
pub fn view_summary(result: &ViewResult) -> String {
    format!(
        "Page {}/{}: {} of {} record(s) selected, {}, {}",
        result.page_number + 1,
        result.page_count,
        result.selection_count,
        result.view_count,
        result.selection_size,
        FieldValue::Length(result.selection_duration),
    )
}

/// Format a group, marking the selected one
#[must_use]
pub fn group_line(index: usize, group: &GroupSummary, selected: bool) -> String {
    let label = match (&group.value, group.classified) {
        (_, true) => "(all classified)".italic().to_string(),
        (Some(value), false) => value.to_string(),
        (None, false) => "(none)".italic().to_string(),
    };
    let marker = if selected { ">".bold().to_string() } else { " ".to_string() };
    format!(
        "{marker} {index:>3} {label} ({} record(s), {})",
        group.count,
        FieldValue::Length(group.length)
    )
}

/// Format a property definition
#[must_use]
pub fn property_line(property: &PropertyDescription, quiet: bool) -> String {
    if quiet {
        return property.name.clone();
    }
    let multiplicity = if property.multiple { "multiple" } else { "single" };
    let mut line = format!(
        "  {} ({}, {multiplicity}, default {})",
        property.name.bold(),
        property.kind,
        property.default_value
    );
    if let Some(values) = &property.enumeration {
        let values: Vec<String> = values.iter().map(ToString::to_string).collect();
        line.push_str(&format!(" one of: {}", values.join(", ")));
    }
    line
}

/// Format a missing record with the found records it may have moved to
#[must_use]
pub fn move_lines(id: RecordId, label: Option<&str>, destinations: &[MoveDestination]) -> Vec<String> {
    let mut lines = vec![format!(
        "  {} [{}]",
        id.to_string().red(),
        label.unwrap_or_default()
    )];
    lines.extend(destinations.iter().map(|d| {
        format!("    -> {} {}", d.record_id, colorize_path(&d.path, true))
    }));
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grouping::GroupValue;
    use crate::schema::PropertyValue;
    use crate::testing::RecordBuilder;

    #[test]
    fn test_record_line_quiet_is_path() {
        let record = RecordBuilder::new(1).path("/v/a.mp4").build();
        assert_eq!(record_line(&record, true), "/v/a.mp4");
    }

    #[test]
    fn test_record_line_lists_properties() {
        colored::control::set_override(false);
        let record = RecordBuilder::new(4)
            .path("/v/a.mp4")
            .size(2048)
            .duration(61)
            .values("genre", &["drama", "war"])
            .build();
        let line = record_line(&record, false);
        assert!(line.contains("/v/a.mp4"));
        assert!(line.contains("2.00 KiB"));
        assert!(line.contains("0:01:01"));
        assert!(line.contains("[genre=drama|war]"));
    }

    #[test]
    fn test_group_line_labels() {
        colored::control::set_override(false);
        let group = GroupSummary {
            value: Some(GroupValue::Property(PropertyValue::from("x"))),
            count: 2,
            length: 3600.0,
            classified: false,
        };
        assert_eq!(group_line(0, &group, true), ">   0 x (2 record(s), 1:00:00)");

        let null = GroupSummary {
            value: None,
            ..group
        };
        assert!(group_line(1, &null, false).contains("(none)"));
    }
}
