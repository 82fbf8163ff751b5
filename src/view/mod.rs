//! Final view assembly
//!
//! Sorts the filtered records, applies the optional selector, computes
//! statistics and cuts out one page. [`ViewResult`] is the serialized shape
//! handed to front-ends.

pub mod error;
pub mod paginator;
pub mod sort;

pub use error::ViewError;
pub use paginator::{Page, PageRequest, Selector, column, paginate};
pub use sort::{SortKey, sort_records};

use crate::grouping::GroupSummary;
use crate::query::SourcePath;
use crate::record::{FileSize, Record};
use crate::schema::PropertyValue;
use crate::search::SearchSpec;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewResult {
    pub records: Vec<Record>,
    pub page_number: usize,
    pub page_count: usize,
    pub view_count: usize,
    pub selection_count: usize,
    pub selection_size: FileSize,
    pub selection_duration: f64,
    pub sources: Vec<SourcePath>,
    pub classifier_path: Vec<PropertyValue>,
    pub search: Option<SearchSpec>,
    pub sort: Vec<SortKey>,
    pub groups: Option<Vec<GroupSummary>>,
    pub group_id: usize,
}
