//! View command - print one page of a layered view

use super::{Context, print_json};
use crate::cli::{ViewArgs, ViewCommand};
use crate::grouping::{GroupSort, GroupingSpec};
use crate::output;
use crate::query::{QueryError, SourcePath};
use crate::record::Field;
use crate::search::{SearchCondition, SearchSpec};
use crate::view::{Selector, SortKey};
use crate::{CatalogError, Library, Result};

/// Execute the view command
///
/// # Errors
/// Returns `CatalogError` for malformed layer arguments or store failures.
pub fn execute(library: &mut Library, command: &ViewCommand, ctx: &Context) -> Result<()> {
    apply_args(library, &command.view)?;
    let mut request = ctx.config.page_request(command.page);
    if let Some(page_size) = command.page_size {
        request.page_size = page_size;
    }
    request.selector = selector(&command.view);

    let result = library.view(&request)?;
    if ctx.json {
        return print_json(&result);
    }

    if let Some(groups) = &result.groups
        && !ctx.quiet
    {
        for (index, group) in groups.iter().enumerate() {
            println!("{}", output::group_line(index, group, index == result.group_id));
        }
        println!();
    }
    for record in &result.records {
        println!("{}", output::record_line(record, ctx.quiet));
    }
    ctx.info(&output::view_summary(&result));
    Ok(())
}

/// Apply the layer arguments to the library's view parameters
///
/// Layers without an argument keep their current value.
///
/// # Errors
/// Returns `CatalogError::QueryError` for an unknown source segment or field,
/// `CatalogError::ViewError` for an unknown sort field, or
/// `CatalogError::InvalidInput` for an unknown group order or search mode.
pub fn apply_args(library: &mut Library, args: &ViewArgs) -> Result<()> {
    if !args.sources.is_empty() {
        let sources = args
            .sources
            .iter()
            .map(|s| s.parse::<SourcePath>())
            .collect::<std::result::Result<Vec<_>, _>>()?;
        library.set_sources(sources);
    }

    let grouping = match (&args.group_by, &args.group_tag) {
        (Some(field), _) => {
            let field =
                Field::parse(field).ok_or_else(|| QueryError::UnknownField(field.clone()))?;
            Some(GroupingSpec::by_field(field))
        }
        (None, Some(property)) => Some(GroupingSpec::by_property(property)),
        (None, None) => None,
    };
    if let Some(grouping) = grouping {
        let sorting = args
            .group_sort
            .parse::<GroupSort>()
            .map_err(CatalogError::InvalidInput)?;
        library.set_grouping(Some(
            grouping
                .sorted(sorting, args.reverse)
                .with_singletons(args.singletons),
        ))?;
    }

    if !args.classifier.is_empty() {
        let property = library
            .params()
            .grouping
            .as_ref()
            .map(|g| g.field.clone())
            .unwrap_or_default();
        let path = library.catalog().parse(&property, &args.classifier)?;
        library.set_classifier(path)?;
    }
    library.set_group(args.group);

    if let Some(text) = &args.search {
        let cond = args
            .search_mode
            .parse::<SearchCondition>()
            .map_err(CatalogError::InvalidInput)?;
        library.set_search(Some(SearchSpec::new(text.as_str(), cond)));
    }

    if !args.sort.is_empty() {
        let sort = args
            .sort
            .iter()
            .map(|s| s.parse::<SortKey>())
            .collect::<std::result::Result<Vec<_>, _>>()?;
        library.set_sort(sort);
    }
    Ok(())
}

/// Selector built from `--include` / `--exclude`
#[must_use]
pub fn selector(args: &ViewArgs) -> Option<Selector> {
    if !args.include.is_empty() {
        Some(Selector::Include(args.include.iter().copied().collect()))
    } else if !args.exclude.is_empty() {
        Some(Selector::Exclude(args.exclude.iter().copied().collect()))
    } else {
        None
    }
}
