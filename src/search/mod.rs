//! Boolean term search
//!
//! Search is plain term matching, no ranking: text is split into lowercase
//! alphanumeric terms and a [`SearchIndex`] maps terms to record identifiers.
//! The store implements the index with a reverse term tree.

use crate::db::DbError;
use crate::record::RecordId;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

static TERM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\p{L}\p{N}]+").expect("term pattern is valid"));

/// How the search text is matched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchCondition {
    /// Every term must match
    #[default]
    And,
    /// Any term may match
    Or,
    /// Every term must match and the record text contains the literal text
    Exact,
    /// The text is a record identifier
    Id,
}

impl FromStr for SearchCondition {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "and" | "all" => Ok(Self::And),
            "or" | "any" => Ok(Self::Or),
            "exact" => Ok(Self::Exact),
            "id" => Ok(Self::Id),
            other => Err(format!("unknown search condition '{other}'")),
        }
    }
}

impl fmt::Display for SearchCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::And => "and",
            Self::Or => "or",
            Self::Exact => "exact",
            Self::Id => "id",
        })
    }
}

/// Search layer of a view
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SearchSpec {
    pub text: String,
    pub cond: SearchCondition,
}

impl SearchSpec {
    #[must_use]
    pub fn new(text: impl Into<String>, cond: SearchCondition) -> Self {
        Self {
            text: text.into(),
            cond,
        }
    }

    /// Blank text means no search at all
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Term combination used for an index lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchMode {
    /// Intersection of the term hits
    All,
    /// Union of the term hits
    Any,
}

/// Reverse term lookup consumed by the query builder
pub trait SearchIndex {
    /// Identifiers of records matching `terms` under `mode`
    ///
    /// An empty term list matches nothing.
    ///
    /// # Errors
    /// Returns `DbError` if the underlying index cannot be read.
    fn lookup(&self, terms: &[String], mode: SearchMode) -> Result<BTreeSet<RecordId>, DbError>;
}

/// Split text into distinct lowercase terms, in first-seen order
#[must_use]
pub fn tokenize(text: &str) -> Vec<String> {
    let mut seen = BTreeSet::new();
    TERM.find_iter(text)
        .map(|m| m.as_str().to_lowercase())
        .filter(|term| seen.insert(term.clone()))
        .collect()
}

/// Combine per-term hit sets according to `mode`
#[must_use]
pub fn combine(hits: Vec<BTreeSet<RecordId>>, mode: SearchMode) -> BTreeSet<RecordId> {
    let mut hits = hits.into_iter();
    let Some(first) = hits.next() else {
        return BTreeSet::new();
    };
    match mode {
        SearchMode::All => hits.fold(first, |acc, set| acc.intersection(&set).copied().collect()),
        SearchMode::Any => hits.fold(first, |mut acc, set| {
            acc.extend(set);
            acc
        }),
    }
}
