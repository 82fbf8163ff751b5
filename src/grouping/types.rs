use crate::record::{Field, FieldValue, RecordId};
use crate::schema::PropertyValue;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Bucket ordering
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GroupSort {
    #[default]
    ByValue,
    ByCount,
    ByLength,
}

impl FromStr for GroupSort {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "by-value" | "value" => Ok(Self::ByValue),
            "by-count" | "count" => Ok(Self::ByCount),
            "by-length" | "length" => Ok(Self::ByLength),
            other => Err(format!("unknown group sort '{other}'")),
        }
    }
}

impl fmt::Display for GroupSort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::ByValue => "by-value",
            Self::ByCount => "by-count",
            Self::ByLength => "by-length",
        })
    }
}

/// Grouping layer of a view
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupingSpec {
    /// Field or property name
    pub field: String,
    pub is_property: bool,
    #[serde(default)]
    pub sorting: GroupSort,
    #[serde(default)]
    pub reverse: bool,
    #[serde(default)]
    pub allow_singletons: bool,
}

impl GroupingSpec {
    #[must_use]
    pub fn by_field(field: Field) -> Self {
        Self {
            field: field.name().to_string(),
            is_property: false,
            sorting: GroupSort::ByValue,
            reverse: false,
            allow_singletons: false,
        }
    }

    #[must_use]
    pub fn by_property(name: &str) -> Self {
        Self {
            field: name.to_string(),
            is_property: true,
            sorting: GroupSort::ByValue,
            reverse: false,
            allow_singletons: false,
        }
    }

    #[must_use]
    pub const fn sorted(mut self, sorting: GroupSort, reverse: bool) -> Self {
        self.sorting = sorting;
        self.reverse = reverse;
        self
    }

    #[must_use]
    pub const fn with_singletons(mut self, allow: bool) -> Self {
        self.allow_singletons = allow;
        self
    }
}

/// Key of a bucket
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(untagged)]
pub enum GroupValue {
    Field(FieldValue),
    Property(PropertyValue),
}

impl fmt::Display for GroupValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Field(value) => write!(f, "{value}"),
            Self::Property(value) => write!(f, "{value}"),
        }
    }
}

/// One bucket of a grouping
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    /// `None` for the null bucket and for the already-classified bucket
    pub value: Option<GroupValue>,
    /// Synthetic bucket of records matching the whole classifier path
    pub classified: bool,
    /// Member identifiers, ascending
    pub ids: Vec<RecordId>,
    /// Summed record length in seconds
    pub length: f64,
}

impl Group {
    #[must_use]
    pub fn count(&self) -> usize {
        self.ids.len()
    }

    #[must_use]
    pub fn summary(&self) -> GroupSummary {
        GroupSummary {
            value: self.value.clone(),
            count: self.count(),
            length: self.length,
            classified: self.classified,
        }
    }
}

/// Serializable view of a group
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupSummary {
    pub value: Option<GroupValue>,
    pub count: usize,
    pub length: f64,
    pub classified: bool,
}
