//! Filter expression tree
//!
//! An `Expr` is a backend-neutral predicate over records. It can be evaluated
//! directly with [`Expr::matches`]; the store compiles it into an index-assisted
//! scan (see `db::query`).

use crate::record::{Field, FieldValue, Record, RecordFlag, RecordId};
use crate::schema::PropertyValue;
use std::collections::BTreeSet;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    True,
    False,
    /// Record flag equals the expected state
    Flag(RecordFlag, bool),
    IdIn(BTreeSet<RecordId>),
    FieldEq(Field, FieldValue),
    /// Property holds this value
    TagEq(String, PropertyValue),
    /// Property has no value
    TagMissing(String),
    /// Property holds every listed value
    TagHoldsAll(String, Vec<PropertyValue>),
    /// Lowercase needle contained in the record's search text
    TextContains(String),
    And(Vec<Expr>),
    Or(Vec<Expr>),
    Not(Box<Expr>),
}

impl Expr {
    /// Conjunction with constant folding and flattening
    #[must_use]
    pub fn and(parts: impl IntoIterator<Item = Self>) -> Self {
        let mut terms = Vec::new();
        for part in parts {
            match part {
                Self::True => {}
                Self::False => return Self::False,
                Self::And(inner) => terms.extend(inner),
                other => terms.push(other),
            }
        }
        match terms.len() {
            0 => Self::True,
            1 => terms.remove(0),
            _ => Self::And(terms),
        }
    }

    /// Disjunction with constant folding and flattening
    #[must_use]
    pub fn or(parts: impl IntoIterator<Item = Self>) -> Self {
        let mut terms = Vec::new();
        for part in parts {
            match part {
                Self::False => {}
                Self::True => return Self::True,
                Self::Or(inner) => terms.extend(inner),
                other => terms.push(other),
            }
        }
        match terms.len() {
            0 => Self::False,
            1 => terms.remove(0),
            _ => Self::Or(terms),
        }
    }

    #[must_use]
    #[allow(clippy::should_implement_trait)]
    pub fn not(inner: Self) -> Self {
        match inner {
            Self::True => Self::False,
            Self::False => Self::True,
            Self::Not(inner) => *inner,
            other => Self::Not(Box::new(other)),
        }
    }

    /// Case-insensitive containment of `text`
    #[must_use]
    pub fn contains_text(text: &str) -> Self {
        Self::TextContains(text.to_lowercase())
    }

    /// Evaluate against a single record
    #[must_use]
    pub fn matches(&self, record: &Record) -> bool {
        match self {
            Self::True => true,
            Self::False => false,
            Self::Flag(flag, expected) => record.flags.get(*flag) == *expected,
            Self::IdIn(ids) => ids.contains(&record.id),
            Self::FieldEq(field, value) => field.value_of(record) == *value,
            Self::TagEq(tag, value) => record.values(tag).contains(value),
            Self::TagMissing(tag) => record.values(tag).is_empty(),
            Self::TagHoldsAll(tag, required) => {
                let held = record.values(tag);
                required.iter().all(|value| held.contains(value))
            }
            Self::TextContains(needle) => record.search_text().to_lowercase().contains(needle),
            Self::And(parts) => parts.iter().all(|p| p.matches(record)),
            Self::Or(parts) => parts.iter().any(|p| p.matches(record)),
            Self::Not(inner) => !inner.matches(record),
        }
    }
}

fn join(f: &mut fmt::Formatter<'_>, parts: &[Expr], sep: &str) -> fmt::Result {
    f.write_str("(")?;
    for (i, part) in parts.iter().enumerate() {
        if i > 0 {
            write!(f, " {sep} ")?;
        }
        write!(f, "{part}")?;
    }
    f.write_str(")")
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::True => f.write_str("TRUE"),
            Self::False => f.write_str("FALSE"),
            Self::Flag(flag, expected) => write!(f, "{} = {expected}", flag.name()),
            Self::IdIn(ids) => write!(f, "id IN <{} ids>", ids.len()),
            Self::FieldEq(field, value) => write!(f, "{field} = {value}"),
            Self::TagEq(tag, value) => write!(f, "{tag} HAS '{value}'"),
            Self::TagMissing(tag) => write!(f, "{tag} IS EMPTY"),
            Self::TagHoldsAll(tag, values) => {
                let values: Vec<_> = values.iter().map(ToString::to_string).collect();
                write!(f, "{tag} HAS ALL [{}]", values.join(", "))
            }
            Self::TextContains(needle) => write!(f, "text CONTAINS '{needle}'"),
            Self::And(parts) => join(f, parts, "AND"),
            Self::Or(parts) => join(f, parts, "OR"),
            Self::Not(inner) => write!(f, "NOT {inner}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn genre(values: &[&str]) -> Record {
        Record::new("/v/a.mp4").with_values(
            "genre",
            values.iter().map(|v| PropertyValue::from(*v)).collect(),
        )
    }

    #[test]
    fn test_and_folding() {
        assert_eq!(Expr::and([]), Expr::True);
        assert_eq!(Expr::and([Expr::True, Expr::False]), Expr::False);
        let flag = Expr::Flag(RecordFlag::Found, true);
        assert_eq!(Expr::and([Expr::True, flag.clone()]), flag);
        assert_eq!(
            Expr::and([Expr::And(vec![flag.clone(), flag.clone()]), flag.clone()]),
            Expr::And(vec![flag.clone(), flag.clone(), flag])
        );
    }

    #[test]
    fn test_or_folding() {
        assert_eq!(Expr::or([]), Expr::False);
        assert_eq!(Expr::or([Expr::False, Expr::True]), Expr::True);
        assert_eq!(Expr::not(Expr::not(Expr::TagMissing("x".into()))), Expr::TagMissing("x".into()));
    }

    #[test]
    fn test_tag_holds_all() {
        let expr = Expr::TagHoldsAll("genre".into(), vec!["x".into(), "y".into()]);
        assert!(expr.matches(&genre(&["y", "z", "x"])));
        assert!(!expr.matches(&genre(&["x"])));
        assert!(!expr.matches(&genre(&[])));
    }

    #[test]
    fn test_tag_missing_and_eq() {
        assert!(Expr::TagMissing("genre".into()).matches(&genre(&[])));
        assert!(Expr::TagEq("genre".into(), "x".into()).matches(&genre(&["x", "y"])));
        assert!(!Expr::TagEq("genre".into(), "z".into()).matches(&genre(&["x"])));
    }

    #[test]
    fn test_text_contains_is_case_insensitive() {
        let record = Record::new("/v/The Movie.mkv");
        assert!(Expr::contains_text("the MOVIE").matches(&record));
        assert!(!Expr::contains_text("other").matches(&record));
    }

    #[test]
    fn test_flags() {
        let record = Record::new("a").not_found();
        assert!(Expr::Flag(RecordFlag::Found, false).matches(&record));
        assert!(Expr::Flag(RecordFlag::Readable, true).matches(&record));
    }

    #[test]
    fn test_display() {
        let expr = Expr::and([
            Expr::Flag(RecordFlag::Readable, true),
            Expr::or([Expr::TagEq("genre".into(), "x".into()), Expr::TagMissing("genre".into())]),
        ]);
        assert_eq!(
            expr.to_string(),
            "(readable = true AND (genre HAS 'x' OR genre IS EMPTY))"
        );
    }
}
