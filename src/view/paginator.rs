//! Selection, statistics and page slicing

use super::error::{Result, ViewError};
use crate::record::{Field, FieldValue, FileSize, Record, RecordId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Narrows a view before statistics and slicing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Selector {
    Include(BTreeSet<RecordId>),
    Exclude(BTreeSet<RecordId>),
}

impl Selector {
    #[must_use]
    pub fn selects(&self, id: RecordId) -> bool {
        match self {
            Self::Include(ids) => ids.contains(&id),
            Self::Exclude(ids) => !ids.contains(&id),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PageRequest {
    /// 0 is treated as 1
    pub page_size: usize,
    pub page_number: usize,
    pub selector: Option<Selector>,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page_size: 20,
            page_number: 0,
            selector: None,
        }
    }
}

impl PageRequest {
    #[must_use]
    pub const fn new(page_size: usize, page_number: usize) -> Self {
        Self {
            page_size,
            page_number,
            selector: None,
        }
    }

    #[must_use]
    pub fn with_selector(mut self, selector: Selector) -> Self {
        self.selector = Some(selector);
        self
    }
}

/// One page of a sorted view plus its statistics
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub records: Vec<Record>,
    pub page_number: usize,
    pub page_count: usize,
    /// Size of the whole filtered view
    pub view_count: usize,
    pub selection_count: usize,
    pub selection_size: FileSize,
    /// Seconds
    pub selection_duration: f64,
}

/// Slice a sorted view into the requested page
///
/// Out-of-range page numbers are clamped, never rejected.
#[must_use]
pub fn paginate(records: Vec<Record>, request: &PageRequest) -> Page {
    let view_count = records.len();
    let selection: Vec<Record> = match &request.selector {
        Some(selector) => records
            .into_iter()
            .filter(|r| selector.selects(r.id))
            .collect(),
        None => records,
    };

    let selection_count = selection.len();
    let selection_size = FileSize(selection.iter().map(|r| r.size).sum());
    let selection_duration = selection.iter().map(Record::length_seconds).sum();

    let page_size = request.page_size.max(1);
    let page_count = selection_count.div_ceil(page_size).max(1);
    let page_number = request.page_number.min(page_count - 1);
    if page_number != request.page_number {
        tracing::warn!(requested = request.page_number, page_number, "page number clamped");
    }

    let start = page_number * page_size;
    let records = selection.into_iter().skip(start).take(page_size).collect();

    Page {
        records,
        page_number,
        page_count,
        view_count,
        selection_count,
        selection_size,
        selection_duration,
    }
}

/// Values of one field over the selected records
///
/// # Errors
/// Returns `ViewError::ArgumentError` for a field spanning several columns.
pub fn column(records: &[Record], selector: Option<&Selector>, field: Field) -> Result<Vec<FieldValue>> {
    if field.is_multi_column() {
        return Err(ViewError::ArgumentError(format!(
            "field '{field}' spans several columns"
        )));
    }
    Ok(records
        .iter()
        .filter(|r| selector.is_none_or(|s| s.selects(r.id)))
        .map(|r| field.value_of(r))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RecordBuilder;

    fn records(n: u64) -> Vec<Record> {
        (1..=n)
            .map(|id| RecordBuilder::new(id).size(100).duration(60).build())
            .collect()
    }

    #[test]
    fn test_page_slicing() {
        let page = paginate(records(25), &PageRequest::new(10, 2));
        assert_eq!(page.page_count, 3);
        assert_eq!(page.page_number, 2);
        assert_eq!(page.records.len(), 5);
        assert_eq!(page.records[0].id, 21);
    }

    #[test]
    fn test_page_number_is_clamped() {
        let page = paginate(records(25), &PageRequest::new(10, 99));
        assert_eq!(page.page_number, 2);

        let empty = paginate(Vec::new(), &PageRequest::new(10, 5));
        assert_eq!(empty.page_count, 1);
        assert_eq!(empty.page_number, 0);
        assert!(empty.records.is_empty());
    }

    #[test]
    fn test_zero_page_size_is_one() {
        let page = paginate(records(3), &PageRequest::new(0, 1));
        assert_eq!(page.page_count, 3);
        assert_eq!(page.records.len(), 1);
        assert_eq!(page.records[0].id, 2);
    }

    #[test]
    fn test_page_count_invariant() {
        for count in 0..12 {
            for size in 1..5 {
                let page = paginate(records(count), &PageRequest::new(size, 0));
                let expected = (count as usize).div_ceil(size).max(1);
                assert_eq!(page.page_count, expected);
                assert!(page.page_number < page.page_count);
            }
        }
    }

    #[test]
    fn test_selector_statistics() {
        let include = Selector::Include([1, 2, 3].into());
        let page = paginate(records(5), &PageRequest::new(2, 0).with_selector(include));
        assert_eq!(page.view_count, 5);
        assert_eq!(page.selection_count, 3);
        assert_eq!(page.selection_size, FileSize(300));
        assert!((page.selection_duration - 180.0).abs() < f64::EPSILON);
        assert_eq!(page.page_count, 2);

        let exclude = Selector::Exclude([1].into());
        let page = paginate(records(5), &PageRequest::new(10, 0).with_selector(exclude));
        assert_eq!(page.selection_count, 4);
        assert_eq!(page.records[0].id, 2);
    }

    #[test]
    fn test_column() {
        let values = column(&records(3), Some(&Selector::Exclude([2].into())), Field::Id).unwrap();
        assert_eq!(values, vec![FieldValue::Int(1), FieldValue::Int(3)]);
        assert!(matches!(
            column(&records(3), None, Field::Resolution),
            Err(ViewError::ArgumentError(_))
        ));
    }
}
