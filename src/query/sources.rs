//! Source flag paths
//!
//! A source path is a conjunction of flag segments written `readable-found`.
//! A view's sources are a disjunction of such paths.

use super::error::QueryError;
use super::expr::Expr;
use crate::record::RecordFlag;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceSegment {
    Readable,
    Unreadable,
    Found,
    NotFound,
    WithThumbnails,
    WithoutThumbnails,
    Discarded,
}

impl SourceSegment {
    pub const ALL: [Self; 7] = [
        Self::Readable,
        Self::Unreadable,
        Self::Found,
        Self::NotFound,
        Self::WithThumbnails,
        Self::WithoutThumbnails,
        Self::Discarded,
    ];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Readable => "readable",
            Self::Unreadable => "unreadable",
            Self::Found => "found",
            Self::NotFound => "not_found",
            Self::WithThumbnails => "with_thumbnails",
            Self::WithoutThumbnails => "without_thumbnails",
            Self::Discarded => "discarded",
        }
    }

    #[must_use]
    pub const fn expr(self) -> Expr {
        match self {
            Self::Readable => Expr::Flag(RecordFlag::Readable, true),
            Self::Unreadable => Expr::Flag(RecordFlag::Readable, false),
            Self::Found => Expr::Flag(RecordFlag::Found, true),
            Self::NotFound => Expr::Flag(RecordFlag::Found, false),
            Self::WithThumbnails => Expr::Flag(RecordFlag::HasThumbnail, true),
            Self::WithoutThumbnails => Expr::Flag(RecordFlag::HasThumbnail, false),
            Self::Discarded => Expr::Flag(RecordFlag::Discarded, true),
        }
    }
}

impl FromStr for SourceSegment {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|segment| segment.name() == s)
            .ok_or_else(|| QueryError::UnknownSource(s.to_string()))
    }
}

/// Conjunction of source segments
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SourcePath(pub Vec<SourceSegment>);

impl SourcePath {
    #[must_use]
    pub fn expr(&self) -> Expr {
        Expr::and(self.0.iter().map(|segment| segment.expr()))
    }
}

impl From<SourceSegment> for SourcePath {
    fn from(segment: SourceSegment) -> Self {
        Self(vec![segment])
    }
}

impl FromStr for SourcePath {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let segments = s
            .split('-')
            .map(str::trim)
            .filter(|segment| !segment.is_empty())
            .map(SourceSegment::from_str)
            .collect::<Result<Vec<_>, _>>()?;
        if segments.is_empty() {
            return Err(QueryError::UnknownSource(s.to_string()));
        }
        Ok(Self(segments))
    }
}

impl fmt::Display for SourcePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<_> = self.0.iter().map(|s| s.name()).collect();
        f.write_str(&names.join("-"))
    }
}

/// Disjunction of source paths; no paths selects nothing
#[must_use]
pub fn sources_expr(sources: &[SourcePath]) -> Expr {
    Expr::or(sources.iter().map(SourcePath::expr))
}
