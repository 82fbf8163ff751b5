//! Multi-key record sorting
//!
//! Sort keys are written `-field` (descending), `+field` or `field`
//! (ascending). Records always fall back to ascending identifier order.

use super::error::ViewError;
use crate::record::{Field, FieldValue, Record};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SortKey {
    pub field: Field,
    pub descending: bool,
}

impl SortKey {
    #[must_use]
    pub const fn ascending(field: Field) -> Self {
        Self {
            field,
            descending: false,
        }
    }

    #[must_use]
    pub const fn descending(field: Field) -> Self {
        Self {
            field,
            descending: true,
        }
    }
}

impl FromStr for SortKey {
    type Err = ViewError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (descending, name) = match s.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, s.strip_prefix('+').unwrap_or(s)),
        };
        let field = Field::parse(name).ok_or_else(|| ViewError::UnknownField(name.to_string()))?;
        Ok(Self { field, descending })
    }
}

impl TryFrom<String> for SortKey {
    type Error = ViewError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<SortKey> for String {
    fn from(key: SortKey) -> Self {
        key.to_string()
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.descending {
            f.write_str("-")?;
        }
        f.write_str(self.field.name())
    }
}

/// One component of a record's sort tuple
#[derive(Debug, PartialEq, Eq)]
struct Directed {
    value: FieldValue,
    descending: bool,
}

impl Ord for Directed {
    fn cmp(&self, other: &Self) -> Ordering {
        let ordering = self.value.cmp(&other.value);
        if self.descending {
            ordering.reverse()
        } else {
            ordering
        }
    }
}

impl PartialOrd for Directed {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Sort records by `keys`, then by ascending identifier
pub fn sort_records(records: &mut [Record], keys: &[SortKey]) {
    records.sort_by_cached_key(|record| {
        let tuple: Vec<Directed> = keys
            .iter()
            .map(|key| Directed {
                value: key.field.value_of(record),
                descending: key.descending,
            })
            .collect();
        (tuple, record.id)
    });
}
