//! Compile view layers into a filter expression

use super::error::{QueryError, Result};
use super::expr::Expr;
use super::sources::{SourcePath, sources_expr};
use crate::grouping::{Group, GroupValue, GroupingSpec};
use crate::record::{Field, RecordId};
use crate::schema::{PropertyCatalog, PropertyValue};
use crate::search::{SearchCondition, SearchIndex, SearchMode, SearchSpec, tokenize};
use std::collections::BTreeSet;

/// Builds filter expressions against a search index and a property catalog
pub struct QueryBuilder<'a, I: SearchIndex + ?Sized> {
    index: &'a I,
    catalog: &'a PropertyCatalog,
}

impl<'a, I: SearchIndex + ?Sized> QueryBuilder<'a, I> {
    #[must_use]
    pub const fn new(index: &'a I, catalog: &'a PropertyCatalog) -> Self {
        Self { index, catalog }
    }

    /// Source and search layers combined
    ///
    /// # Errors
    /// Returns `QueryError::Database` if the search index cannot be read.
    pub fn filter(&self, sources: &[SourcePath], search: Option<&SearchSpec>) -> Result<Expr> {
        let sources = sources_expr(sources);
        if sources == Expr::False {
            return Ok(Expr::False);
        }
        Ok(Expr::and([sources, self.search(search)?]))
    }

    /// Search layer alone
    ///
    /// # Errors
    /// Returns `QueryError::Database` if the search index cannot be read.
    pub fn search(&self, search: Option<&SearchSpec>) -> Result<Expr> {
        let Some(spec) = search.filter(|s| !s.is_blank()) else {
            return Ok(Expr::True);
        };
        let text = spec.text.trim();
        match spec.cond {
            SearchCondition::Id => Ok(text
                .parse::<RecordId>()
                .map_or(Expr::False, |id| Expr::IdIn(BTreeSet::from([id])))),
            SearchCondition::And => self.lookup(text, SearchMode::All),
            SearchCondition::Or => self.lookup(text, SearchMode::Any),
            SearchCondition::Exact => Ok(Expr::and([
                self.lookup(text, SearchMode::All)?,
                Expr::contains_text(text),
            ])),
        }
    }

    /// Predicate selecting the members of one group
    ///
    /// # Errors
    /// Returns `QueryError::UnknownField` for an unknown grouping field, or
    /// `QueryError::Schema` for an undefined grouping property.
    pub fn group_predicate(
        &self,
        grouping: &GroupingSpec,
        classifier: &[PropertyValue],
        group: &Group,
    ) -> Result<Expr> {
        if !grouping.is_property {
            let field = Field::parse(&grouping.field)
                .ok_or_else(|| QueryError::UnknownField(grouping.field.clone()))?;
            return Ok(match &group.value {
                Some(GroupValue::Field(value)) => Expr::FieldEq(field, value.clone()),
                _ => Expr::False,
            });
        }

        let property = self.catalog.require(&grouping.field)?;
        let name = property.name.clone();

        if !property.multiple {
            return Ok(match &group.value {
                Some(GroupValue::Property(value)) if *value == property.default => Expr::or([
                    Expr::TagEq(name.clone(), value.clone()),
                    Expr::TagMissing(name),
                ]),
                Some(GroupValue::Property(value)) => Expr::TagEq(name, value.clone()),
                _ => Expr::TagMissing(name),
            });
        }

        Ok(match &group.value {
            _ if group.classified => Expr::TagHoldsAll(name, classifier.to_vec()),
            Some(GroupValue::Property(value)) => {
                let mut required = classifier.to_vec();
                required.push(value.clone());
                Expr::TagHoldsAll(name, required)
            }
            _ if classifier.is_empty() => Expr::TagMissing(name),
            _ => Expr::False,
        })
    }

    fn lookup(&self, text: &str, mode: SearchMode) -> Result<Expr> {
        let terms = tokenize(text);
        if terms.is_empty() {
            return Ok(Expr::False);
        }
        let ids = self.index.lookup(&terms, mode)?;
        tracing::debug!(terms = terms.len(), hits = ids.len(), "search lookup");
        Ok(Expr::IdIn(ids))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbError;
    use crate::grouping::GroupSort;
    use crate::record::FieldValue;
    use crate::schema::PropertyKind;
    use crate::search::combine;
    use crate::query::sources::SourceSegment;
    use std::collections::BTreeMap;

    #[derive(Default)]
    struct MemoryIndex(BTreeMap<String, BTreeSet<RecordId>>);

    impl MemoryIndex {
        fn with(mut self, term: &str, ids: &[RecordId]) -> Self {
            self.0.insert(term.into(), ids.iter().copied().collect());
            self
        }
    }

    impl SearchIndex for MemoryIndex {
        fn lookup(
            &self,
            terms: &[String],
            mode: SearchMode,
        ) -> std::result::Result<BTreeSet<RecordId>, DbError> {
            let hits = terms
                .iter()
                .map(|t| self.0.get(t).cloned().unwrap_or_default())
                .collect();
            Ok(combine(hits, mode))
        }
    }

    fn catalog() -> PropertyCatalog {
        let mut catalog = PropertyCatalog::default();
        catalog
            .define("genre", PropertyKind::Str, true, None, None)
            .unwrap();
        catalog
            .define(
                "quality",
                PropertyKind::Str,
                false,
                Some(vec!["sd".into(), "hd".into()]),
                None,
            )
            .unwrap();
        catalog
    }

    fn group(value: Option<GroupValue>, classified: bool) -> Group {
        Group {
            value,
            classified,
            ids: vec![],
            length: 0.0,
        }
    }

    #[test]
    fn test_id_search() {
        let index = MemoryIndex::default();
        let catalog = catalog();
        let builder = QueryBuilder::new(&index, &catalog);

        let expr = builder
            .search(Some(&SearchSpec::new(" 42 ", SearchCondition::Id)))
            .unwrap();
        assert_eq!(expr, Expr::IdIn(BTreeSet::from([42])));

        let expr = builder
            .search(Some(&SearchSpec::new("forty-two", SearchCondition::Id)))
            .unwrap();
        assert_eq!(expr, Expr::False);
    }

    #[test]
    fn test_and_or_search() {
        let index = MemoryIndex::default()
            .with("summer", &[1, 2])
            .with("beach", &[2, 3]);
        let catalog = catalog();
        let builder = QueryBuilder::new(&index, &catalog);

        let and = builder
            .search(Some(&SearchSpec::new("Summer beach", SearchCondition::And)))
            .unwrap();
        assert_eq!(and, Expr::IdIn(BTreeSet::from([2])));

        let or = builder
            .search(Some(&SearchSpec::new("summer beach", SearchCondition::Or)))
            .unwrap();
        assert_eq!(or, Expr::IdIn(BTreeSet::from([1, 2, 3])));
    }

    #[test]
    fn test_exact_adds_text_filter() {
        let index = MemoryIndex::default().with("summer", &[1]).with("beach", &[1]);
        let catalog = catalog();
        let builder = QueryBuilder::new(&index, &catalog);
        let expr = builder
            .search(Some(&SearchSpec::new("Summer Beach", SearchCondition::Exact)))
            .unwrap();
        assert_eq!(
            expr,
            Expr::And(vec![
                Expr::IdIn(BTreeSet::from([1])),
                Expr::TextContains("summer beach".into())
            ])
        );
    }

    #[test]
    fn test_blank_search_is_ignored() {
        let index = MemoryIndex::default();
        let catalog = catalog();
        let builder = QueryBuilder::new(&index, &catalog);
        let expr = builder
            .filter(
                &[SourcePath::from(SourceSegment::Readable)],
                Some(&SearchSpec::new("  ", SearchCondition::And)),
            )
            .unwrap();
        assert_eq!(expr, SourceSegment::Readable.expr());
    }

    #[test]
    fn test_single_valued_default_bucket() {
        let index = MemoryIndex::default();
        let catalog = catalog();
        let builder = QueryBuilder::new(&index, &catalog);
        let grouping = GroupingSpec::by_property("quality");

        let default = builder
            .group_predicate(&grouping, &[], &group(Some(GroupValue::Property("sd".into())), false))
            .unwrap();
        assert_eq!(
            default,
            Expr::Or(vec![
                Expr::TagEq("quality".into(), "sd".into()),
                Expr::TagMissing("quality".into())
            ])
        );

        let other = builder
            .group_predicate(&grouping, &[], &group(Some(GroupValue::Property("hd".into())), false))
            .unwrap();
        assert_eq!(other, Expr::TagEq("quality".into(), "hd".into()));
    }

    #[test]
    fn test_multi_valued_buckets() {
        let index = MemoryIndex::default();
        let catalog = catalog();
        let builder = QueryBuilder::new(&index, &catalog);
        let grouping = GroupingSpec::by_property("genre").sorted(GroupSort::ByCount, true);

        let null = builder.group_predicate(&grouping, &[], &group(None, false)).unwrap();
        assert_eq!(null, Expr::TagMissing("genre".into()));

        let path = vec![PropertyValue::from("x")];
        let classified = builder.group_predicate(&grouping, &path, &group(None, true)).unwrap();
        assert_eq!(classified, Expr::TagHoldsAll("genre".into(), path.clone()));

        let sibling = builder
            .group_predicate(&grouping, &path, &group(Some(GroupValue::Property("y".into())), false))
            .unwrap();
        assert_eq!(
            sibling,
            Expr::TagHoldsAll("genre".into(), vec!["x".into(), "y".into()])
        );
    }

    #[test]
    fn test_field_bucket() {
        let index = MemoryIndex::default();
        let catalog = catalog();
        let builder = QueryBuilder::new(&index, &catalog);
        let grouping = GroupingSpec::by_field(Field::Width);
        let expr = builder
            .group_predicate(&grouping, &[], &group(Some(GroupValue::Field(FieldValue::Int(640))), false))
            .unwrap();
        assert_eq!(expr, Expr::FieldEq(Field::Width, FieldValue::Int(640)));

        let unknown = GroupingSpec {
            field: "colour".into(),
            ..grouping
        };
        assert!(matches!(
            builder.group_predicate(&unknown, &[], &group(None, false)),
            Err(QueryError::UnknownField(_))
        ));
    }
}
