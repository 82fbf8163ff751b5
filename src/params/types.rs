use crate::grouping::GroupingSpec;
use crate::query::{SourcePath, SourceSegment};
use crate::record::Field;
use crate::schema::PropertyValue;
use crate::search::SearchSpec;
use crate::view::SortKey;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The six filter layers of a view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ViewParameters {
    pub sources: Vec<SourcePath>,
    pub grouping: Option<GroupingSpec>,
    pub classifier: Vec<PropertyValue>,
    pub group_id: usize,
    pub search: Option<SearchSpec>,
    pub sort: Vec<SortKey>,
}

impl ViewParameters {
    #[must_use]
    pub fn default_sources() -> Vec<SourcePath> {
        vec![SourcePath::from(SourceSegment::Readable)]
    }

    #[must_use]
    pub fn default_sort() -> Vec<SortKey> {
        vec![SortKey::descending(Field::Date)]
    }
}

impl Default for ViewParameters {
    fn default() -> Self {
        Self {
            sources: Self::default_sources(),
            grouping: None,
            classifier: Vec::new(),
            group_id: 0,
            search: None,
            sort: Self::default_sort(),
        }
    }
}

/// Layer selector for resets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Layer {
    Sources,
    Grouping,
    Classifier,
    Group,
    Search,
    Sort,
}

impl FromStr for Layer {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sources" => Ok(Self::Sources),
            "grouping" => Ok(Self::Grouping),
            "classifier" => Ok(Self::Classifier),
            "group" => Ok(Self::Group),
            "search" => Ok(Self::Search),
            "sort" => Ok(Self::Sort),
            other => Err(format!("unknown layer '{other}'")),
        }
    }
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Sources => "sources",
            Self::Grouping => "grouping",
            Self::Classifier => "classifier",
            Self::Group => "group",
            Self::Search => "search",
            Self::Sort => "sort",
        })
    }
}
