//! Library facade
//!
//! Owns the record store, the property catalog, the view parameters and the
//! caches derived from them. Every mutation that can change a cached result
//! goes through here so invalidation happens before the next read.

use crate::db::{Database, DbError};
use crate::grouping::{Group, GroupValue, GroupingEngine, GroupingKey, GroupingSpec, compute_groups};
use crate::moves::{MoveDestination, MoveDetector, MoveIndex};
use crate::params::{Layer, ParameterStore, ViewParameters};
use crate::query::{Expr, QueryBuilder, QueryError, SourcePath};
use crate::record::{Field, FieldValue, Record, RecordId};
use crate::schema::{CatalogChange, PropertyCatalog, PropertyKind, PropertyValue};
use crate::search::SearchSpec;
use crate::view::{self, PageRequest, SortKey, ViewResult};
use crate::{CatalogError, Result};
use std::collections::BTreeSet;
use std::path::Path;
use std::sync::Arc;

pub struct Library {
    db: Database,
    catalog: PropertyCatalog,
    params: ParameterStore,
    groups: Arc<GroupingEngine>,
    moves: Arc<MoveDetector>,
}

impl Library {
    /// Open the store at `path` with default view parameters
    ///
    /// # Errors
    /// Returns `CatalogError::DbError` if the store cannot be opened or its
    /// property definitions cannot be read.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::with_params(Database::open(path)?, ViewParameters::default())
    }

    /// Wrap an open store, starting from `params`
    ///
    /// # Errors
    /// Returns `CatalogError::DbError` if property definitions cannot be read.
    pub fn with_params(db: Database, params: ViewParameters) -> Result<Self> {
        let catalog = PropertyCatalog::from_types(db.load_properties()?);
        let groups = Arc::new(GroupingEngine::new());
        let moves = Arc::new(MoveDetector::new());
        let mut params = ParameterStore::new(params);
        params.subscribe(groups.clone());
        params.subscribe(moves.clone());
        tracing::debug!(properties = catalog.len(), records = db.count(), "library opened");
        Ok(Self {
            db,
            catalog,
            params,
            groups,
            moves,
        })
    }

    #[must_use]
    pub const fn db(&self) -> &Database {
        &self.db
    }

    #[must_use]
    pub const fn catalog(&self) -> &PropertyCatalog {
        &self.catalog
    }

    #[must_use]
    pub const fn params(&self) -> &ViewParameters {
        self.params.params()
    }

    // Records

    /// Validate and store a new record
    ///
    /// A record with id 0 gets the next free identifier.
    ///
    /// # Errors
    /// Returns `CatalogError::SchemaError` for property values the catalog
    /// rejects, or `CatalogError::DbError` wrapping `InvalidInput` for an
    /// identifier already in use.
    pub fn insert_record(&mut self, record: Record) -> Result<RecordId> {
        let mut ids = self.import(vec![record])?;
        ids.pop()
            .ok_or_else(|| CatalogError::InvalidInput("no record stored".into()))
    }

    /// Store a batch of new records
    ///
    /// Every record is validated and every explicit identifier checked before
    /// the first write. Returned ids follow the input order.
    ///
    /// # Errors
    /// Same as [`Self::insert_record`], plus `InvalidInput` for an identifier
    /// repeated within the batch.
    pub fn import(&mut self, records: Vec<Record>) -> Result<Vec<RecordId>> {
        self.check_new_ids(&records)?;
        let records = records
            .into_iter()
            .map(|record| self.validate_record(record))
            .collect::<Result<Vec<_>>>()?;

        // Explicit ids are stored first so auto-assigned ones never take them.
        let mut ids = vec![0; records.len()];
        let (explicit, assigned): (Vec<_>, Vec<_>) =
            records.into_iter().enumerate().partition(|(_, r)| r.id != 0);
        for (index, record) in explicit.into_iter().chain(assigned) {
            ids[index] = self.db.insert(record)?;
        }
        tracing::info!(count = ids.len(), "imported records");
        self.params.force_update();
        Ok(ids)
    }

    /// Replace an existing record
    ///
    /// # Errors
    /// Returns `CatalogError::DbError` wrapping `RecordNotFound` if the record
    /// does not exist yet, or `CatalogError::SchemaError` for rejected values.
    pub fn update_record(&mut self, record: Record) -> Result<()> {
        self.db.require(record.id)?;
        let record = self.validate_record(record)?;
        self.db.insert(record)?;
        self.params.force_update();
        Ok(())
    }

    /// # Errors
    /// Returns `CatalogError::DbError` if the write fails.
    pub fn remove_record(&mut self, id: RecordId) -> Result<bool> {
        let removed = self.db.remove(id)?;
        if removed {
            self.params.force_update();
        }
        Ok(removed)
    }

    /// Set the values of a property on several records
    ///
    /// Values are validated once for all records; nothing is written if any
    /// identifier is unknown.
    ///
    /// # Errors
    /// Returns `CatalogError::SchemaError` for an unknown property or invalid
    /// values, or `CatalogError::DbError` for an unknown record.
    pub fn set_tag(&mut self, ids: &[RecordId], property: &str, values: Vec<PropertyValue>) -> Result<usize> {
        let values = self.catalog.validate(property, values)?;
        let count = self.db.set_property_values(ids, property, &values)?;
        self.params.notify_modified(property, true);
        Ok(count)
    }

    fn check_new_ids(&self, records: &[Record]) -> Result<()> {
        let mut seen = BTreeSet::new();
        for id in records.iter().map(|r| r.id).filter(|&id| id != 0) {
            let problem = if id == RecordId::MAX {
                "is out of range"
            } else if !seen.insert(id) {
                "is repeated in the batch"
            } else if self.db.contains(id)? {
                "is already in use"
            } else {
                continue;
            };
            return Err(DbError::InvalidInput(format!("record id {id} {problem}")).into());
        }
        Ok(())
    }

    fn validate_record(&self, mut record: Record) -> Result<Record> {
        let properties = std::mem::take(&mut record.properties);
        for (name, values) in properties {
            let values = self.catalog.validate(&name, values)?;
            record.set_values(&name, values);
        }
        Ok(record)
    }

    // Catalog

    /// # Errors
    /// Returns `CatalogError::SchemaError` for a duplicate or malformed definition.
    pub fn define_property(
        &mut self,
        name: &str,
        kind: PropertyKind,
        multiple: bool,
        enumeration: Option<Vec<PropertyValue>>,
        default: Option<PropertyValue>,
    ) -> Result<()> {
        let mut catalog = self.catalog.clone();
        let change = catalog.define(name, kind, multiple, enumeration, default)?;
        self.commit(catalog, &change)
    }

    /// Rename a property on the catalog and on every record holding it
    ///
    /// # Errors
    /// Returns `CatalogError::SchemaError` for an unknown or taken name.
    pub fn rename_property(&mut self, old: &str, new: &str) -> Result<()> {
        let mut catalog = self.catalog.clone();
        let change = catalog.rename(old, new)?;
        self.commit(catalog, &change)?;
        if let CatalogChange::Renamed { old, new } = &change {
            self.params.rename_grouping_property(old, new);
        }
        Ok(())
    }

    /// Remove a property and its values
    ///
    /// # Errors
    /// Returns `CatalogError::SchemaError` for an unknown property.
    pub fn remove_property(&mut self, name: &str) -> Result<()> {
        let mut catalog = self.catalog.clone();
        let change = catalog.remove(name)?;
        self.commit(catalog, &change)?;
        if self
            .params
            .params()
            .grouping
            .as_ref()
            .is_some_and(|g| g.is_property && g.field == name)
        {
            self.params.reset(Layer::Grouping);
        }
        Ok(())
    }

    /// Switch a property between single- and multi-valued
    ///
    /// # Errors
    /// Returns `CatalogError::SchemaError` for an unknown property, or
    /// `CatalogError::DbError` wrapping `InvalidTagValue` when making a
    /// property single-valued while some record holds several values.
    pub fn set_multiplicity(&mut self, name: &str, multiple: bool) -> Result<()> {
        let mut catalog = self.catalog.clone();
        let change = catalog.set_multiplicity(name, multiple)?;
        self.commit(catalog, &change)?;
        if !multiple && self.params.notify_modified(name, true) {
            self.params.classifier_reset();
        }
        Ok(())
    }

    fn commit(&mut self, catalog: PropertyCatalog, change: &CatalogChange) -> Result<()> {
        let rewritten = self.db.apply_catalog_change(change)?;
        match change {
            CatalogChange::Defined(name) | CatalogChange::MultiplicityChanged { name, .. } => {
                self.db.save_property(catalog.require(name)?)?;
            }
            CatalogChange::Renamed { old, new } => {
                self.db.delete_property(old)?;
                self.db.save_property(catalog.require(new)?)?;
            }
            CatalogChange::Removed(name) => {
                self.db.delete_property(name)?;
            }
        }
        self.catalog = catalog;
        tracing::info!(?change, rewritten, "catalog changed");
        self.params.force_update();
        Ok(())
    }

    // View parameters

    pub fn set_sources(&mut self, sources: Vec<SourcePath>) {
        self.params.set_sources(sources);
    }

    pub fn set_search(&mut self, search: Option<SearchSpec>) {
        self.params.set_search(search);
    }

    /// # Errors
    /// Returns `CatalogError::QueryError` for an unknown field, or
    /// `CatalogError::SchemaError` for an undefined property.
    pub fn set_grouping(&mut self, grouping: Option<GroupingSpec>) -> Result<()> {
        if let Some(grouping) = &grouping {
            if grouping.is_property {
                self.catalog.require(&grouping.field)?;
            } else if Field::parse(&grouping.field).is_none() {
                return Err(QueryError::UnknownField(grouping.field.clone()).into());
            }
        }
        self.params.set_grouping(grouping);
        Ok(())
    }

    /// # Errors
    /// Returns `CatalogError::ParamsError` for an invalid classifier value.
    pub fn classifier_push(&mut self, value: PropertyValue) -> Result<()> {
        Ok(self.params.classifier_push(value, &self.catalog)?)
    }

    /// # Errors
    /// Returns `CatalogError::ParamsError` for an invalid classifier path.
    pub fn set_classifier(&mut self, path: Vec<PropertyValue>) -> Result<()> {
        Ok(self.params.set_classifier(path, &self.catalog)?)
    }

    pub fn classifier_pop(&mut self) -> Option<PropertyValue> {
        self.params.classifier_pop()
    }

    pub fn classifier_reset(&mut self) {
        self.params.classifier_reset();
    }

    /// Drill into the selected group
    ///
    /// Returns false when the selected group has no value to push (the null
    /// bucket, the already-classified bucket, or no groups at all).
    ///
    /// # Errors
    /// Returns `CatalogError::ParamsError` unless grouping by a multi-valued
    /// property.
    pub fn classifier_select_group(&mut self) -> Result<bool> {
        let Some(grouping) = self.params.params().grouping.clone() else {
            return Err(crate::params::ParamsError::NoGrouping.into());
        };
        let filter = self.filter()?;
        let groups = self.groups_for(&grouping, &filter)?;
        let group_id = self.params.clamp_group(groups.len());
        match groups.get(group_id).and_then(|g| g.value.clone()) {
            Some(GroupValue::Property(value)) => {
                self.classifier_push(value)?;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    pub const fn set_group(&mut self, group_id: usize) {
        self.params.set_group(group_id);
    }

    pub fn set_sort(&mut self, sort: Vec<SortKey>) {
        self.params.set_sort(sort);
    }

    pub fn reset(&mut self, layer: Layer) {
        self.params.reset(layer);
    }

    /// Invalidate every derived cache
    pub fn force_update(&self) {
        self.params.force_update();
    }

    // Views

    /// Compute one page of the current view
    ///
    /// # Errors
    /// Returns `CatalogError::QueryError` or `CatalogError::SchemaError` when the
    /// grouping no longer resolves, or `CatalogError::DbError` on store failures.
    pub fn view(&mut self, request: &PageRequest) -> Result<ViewResult> {
        let (records, groups) = self.view_records()?;
        let page = view::paginate(records, request);
        let params = self.params.params();
        Ok(ViewResult {
            records: page.records,
            page_number: page.page_number,
            page_count: page.page_count,
            view_count: page.view_count,
            selection_count: page.selection_count,
            selection_size: page.selection_size,
            selection_duration: page.selection_duration,
            sources: params.sources.clone(),
            classifier_path: params.classifier.clone(),
            search: params.search.clone(),
            sort: params.sort.clone(),
            groups: groups.map(|groups| groups.iter().map(Group::summary).collect()),
            group_id: params.group_id,
        })
    }

    /// One field of every selected record of the current view, in view order
    ///
    /// # Errors
    /// Returns `CatalogError::ViewError` for a multi-column field, plus the
    /// errors of [`Self::view`].
    pub fn column(&mut self, request: &PageRequest, field: Field) -> Result<Vec<FieldValue>> {
        let (records, _) = self.view_records()?;
        Ok(view::column(&records, request.selector.as_ref(), field)?)
    }

    fn filter(&self) -> Result<Expr> {
        let params = self.params.params();
        let builder = QueryBuilder::new(&self.db, &self.catalog);
        Ok(builder.filter(&params.sources, params.search.as_ref())?)
    }

    fn groups_for(&self, grouping: &GroupingSpec, filter: &Expr) -> Result<Arc<Vec<Group>>> {
        let params = self.params.params();
        let key = GroupingKey {
            sources: params.sources.clone(),
            search: params.search.clone(),
            grouping: grouping.clone(),
            classifier: params.classifier.clone(),
        };
        Ok(self.groups.groups_with(&key, || {
            let records = self.db.select(filter)?;
            compute_groups(&records, grouping, &self.catalog, &params.classifier)
        })?)
    }

    /// Sorted records of the whole view and the groups, if grouping
    fn view_records(&mut self) -> Result<(Vec<Record>, Option<Arc<Vec<Group>>>)> {
        let filter = self.filter()?;
        let (expr, groups) = match self.params.params().grouping.clone() {
            None => (filter, None),
            Some(grouping) => {
                let groups = self.groups_for(&grouping, &filter)?;
                let group_id = self.params.clamp_group(groups.len());
                let expr = match groups.get(group_id) {
                    Some(group) => {
                        let builder = QueryBuilder::new(&self.db, &self.catalog);
                        let classifier = &self.params.params().classifier;
                        Expr::and([filter, builder.group_predicate(&grouping, classifier, group)?])
                    }
                    None => Expr::False,
                };
                (expr, Some(groups))
            }
        };

        let mut records = self.db.select(&expr)?;
        view::sort_records(&mut records, &self.params.params().sort);
        Ok((records, groups))
    }

    // Moves

    /// # Errors
    /// Returns `CatalogError::DbError` if the records cannot be read.
    pub fn move_index(&self) -> Result<Arc<MoveIndex>> {
        Ok(self.moves.index_with(|| self.db.list_all())?)
    }

    /// Found records the missing record `id` may have moved to
    ///
    /// # Errors
    /// Same as [`Self::move_index`].
    pub fn move_candidates(&self, id: RecordId) -> Result<Vec<MoveDestination>> {
        Ok(self.move_index()?.candidates(id).to_vec())
    }

    /// # Errors
    /// Same as [`Self::move_index`].
    pub fn move_group_id(&self, id: RecordId) -> Result<Option<String>> {
        Ok(self.move_index()?.move_group_id(id).map(String::from))
    }

    /// Resolve a move: `from` takes the path and flags of `to`, which is removed
    ///
    /// # Errors
    /// Returns `CatalogError::InvalidInput` unless `to` is a move candidate of
    /// `from`, or `CatalogError::DbError` on store failures.
    pub fn apply_move(&mut self, from: RecordId, to: RecordId) -> Result<()> {
        if !self.move_candidates(from)?.iter().any(|d| d.record_id == to) {
            return Err(CatalogError::InvalidInput(format!(
                "record {to} is not a move candidate of record {from}"
            )));
        }
        let mut record = self.db.require(from)?;
        let destination = self.db.require(to)?;
        record.path = destination.path;
        record.flags = destination.flags;
        self.db.remove(to)?;
        self.db.insert(record)?;
        tracing::info!(from, to, "applied move");
        self.params.force_update();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grouping::GroupSort;
    use crate::query::SourceSegment;
    use crate::search::SearchCondition;
    use crate::testing::{RecordBuilder, TestLibrary};
    use crate::view::Selector;

    fn library(name: &str) -> TestLibrary {
        let mut library = TestLibrary::new(name);
        library
            .define_property("genre", PropertyKind::Str, true, None, None)
            .unwrap();
        library
    }

    fn genre_library(name: &str) -> TestLibrary {
        let mut library = library(name);
        library
            .import(vec![
                RecordBuilder::new(1).duration(10).build(),
                RecordBuilder::new(2).values("genre", &["x"]).duration(20).build(),
                RecordBuilder::new(3).values("genre", &["x", "y"]).duration(30).build(),
            ])
            .unwrap();
        library
    }

    fn ids(result: &ViewResult) -> Vec<RecordId> {
        result.records.iter().map(|r| r.id).collect()
    }

    #[test]
    fn test_default_view() {
        let mut library = genre_library("test_library_default");
        library.set_sort(vec![SortKey::ascending(Field::Id)]);
        let result = library.view(&PageRequest::default()).unwrap();
        assert_eq!(ids(&result), vec![1, 2, 3]);
        assert_eq!(result.view_count, 3);
        assert_eq!(result.page_count, 1);
        assert!(result.groups.is_none());
    }

    #[test]
    fn test_grouped_view_with_classifier() {
        let mut library = genre_library("test_library_grouped");
        library
            .set_grouping(Some(
                GroupingSpec::by_property("genre")
                    .sorted(GroupSort::ByCount, true)
                    .with_singletons(true),
            ))
            .unwrap();

        let result = library.view(&PageRequest::default()).unwrap();
        let counts: Vec<usize> = result.groups.as_ref().unwrap().iter().map(|g| g.count).collect();
        assert_eq!(counts, vec![2, 1, 1]);
        assert_eq!(ids(&result), vec![2, 3]);

        assert!(library.classifier_select_group().unwrap());
        assert_eq!(library.params().classifier, vec![PropertyValue::from("x")]);
        let result = library.view(&PageRequest::default()).unwrap();
        let groups = result.groups.as_ref().unwrap();
        assert!(groups[0].classified);
        assert_eq!(groups[0].count, 2);
        assert_eq!(ids(&result).len(), 2);

        library.set_group(1);
        let result = library.view(&PageRequest::default()).unwrap();
        assert_eq!(ids(&result), vec![3]);
    }

    #[test]
    fn test_group_index_is_clamped() {
        let mut library = genre_library("test_library_clamp");
        library
            .set_grouping(Some(GroupingSpec::by_property("genre").with_singletons(true)))
            .unwrap();
        library.set_group(50);
        let result = library.view(&PageRequest::default()).unwrap();
        assert_eq!(result.group_id, 2);
    }

    #[test]
    fn test_search_by_missing_id_is_empty() {
        let mut library = genre_library("test_library_search_id");
        library.set_search(Some(SearchSpec::new("42", SearchCondition::Id)));
        let result = library.view(&PageRequest::default()).unwrap();
        assert!(result.records.is_empty());
        assert_eq!(result.page_count, 1);
    }

    #[test]
    fn test_catalog_changes_invalidate_groups() {
        let mut library = genre_library("test_library_catalog");
        library
            .set_grouping(Some(GroupingSpec::by_property("genre").with_singletons(true)))
            .unwrap();
        library.view(&PageRequest::default()).unwrap();

        library.rename_property("genre", "style").unwrap();
        assert_eq!(library.params().grouping.as_ref().unwrap().field, "style");
        let result = library.view(&PageRequest::default()).unwrap();
        assert_eq!(result.groups.unwrap().len(), 3);
        assert_eq!(library.db().require(3).unwrap().values("style").len(), 2);

        library.remove_property("style").unwrap();
        assert!(library.params().grouping.is_none());
        assert!(library.db().require(3).unwrap().properties.is_empty());
    }

    #[test]
    fn test_set_tag_validates_before_writing() {
        let mut library = genre_library("test_library_set_tag");
        assert!(library.set_tag(&[1], "mood", vec!["calm".into()]).is_err());
        assert!(library.set_tag(&[1, 99], "genre", vec!["z".into()]).is_err());
        assert!(library.db().require(1).unwrap().values("genre").is_empty());

        assert_eq!(library.set_tag(&[1, 2], "genre", vec!["z".into()]).unwrap(), 2);
        assert_eq!(library.db().require(2).unwrap().values("genre"), &[PropertyValue::from("z")]);
    }

    #[test]
    fn test_import_is_all_or_nothing() {
        let mut library = genre_library("test_library_import");
        let result = library.import(vec![
            RecordBuilder::new(10).build(),
            RecordBuilder::new(11).values("mood", &["calm"]).build(),
        ]);
        assert!(matches!(result, Err(CatalogError::SchemaError(_))));
        assert_eq!(library.db().count(), 3);
    }

    #[test]
    fn test_import_rejects_last_id_before_writing() {
        let mut library = genre_library("test_library_import_last_id");
        let result = library.import(vec![
            RecordBuilder::new(10).build(),
            RecordBuilder::new(RecordId::MAX).build(),
        ]);
        assert!(matches!(result, Err(CatalogError::DbError(DbError::InvalidInput(_)))));
        assert_eq!(library.db().count(), 3);
        assert!(!library.db().contains(10).unwrap());
    }

    #[test]
    fn test_import_rejects_ids_in_use() {
        let mut library = genre_library("test_library_import_taken");
        let taken = library.import(vec![RecordBuilder::new(1).path("/v/other.mp4").build()]);
        assert!(matches!(taken, Err(CatalogError::DbError(DbError::InvalidInput(_)))));

        let repeated = library.import(vec![
            RecordBuilder::new(5).build(),
            RecordBuilder::new(5).path("/v/other.mp4").build(),
        ]);
        assert!(matches!(repeated, Err(CatalogError::DbError(DbError::InvalidInput(_)))));

        assert_eq!(library.db().count(), 3);
        assert_eq!(library.db().require(1).unwrap().path, Path::new("/media/video-1.mp4"));
        assert!(!library.db().contains(5).unwrap());
    }

    #[test]
    fn test_import_assigns_ids_around_explicit_ones() {
        let mut library = library("test_library_import_assign");
        let ids = library
            .import(vec![Record::new("/v/auto.mp4"), RecordBuilder::new(1).build()])
            .unwrap();
        assert_eq!(ids, vec![2, 1]);
        assert_eq!(library.db().require(2).unwrap().path, Path::new("/v/auto.mp4"));

        let id = library.insert_record(Record::new("/v/next.mp4")).unwrap();
        assert_eq!(id, 3);
    }

    #[test]
    fn test_update_record_replaces_existing() {
        let mut library = genre_library("test_library_update");
        library
            .update_record(RecordBuilder::new(2).path("/v/renamed.mp4").build())
            .unwrap();
        assert_eq!(library.db().require(2).unwrap().path, Path::new("/v/renamed.mp4"));
        assert!(library.update_record(RecordBuilder::new(9).build()).is_err());
        assert_eq!(library.db().count(), 3);
    }

    #[test]
    fn test_set_tag_counts_distinct_records() {
        let mut library = genre_library("test_library_set_tag_distinct");
        assert_eq!(library.set_tag(&[2, 2, 3], "genre", vec!["z".into()]).unwrap(), 2);
    }

    #[test]
    fn test_single_valued_switch_is_refused() {
        let mut library = genre_library("test_library_multiplicity");
        assert!(library.set_multiplicity("genre", false).is_err());
        assert!(library.catalog().require("genre").unwrap().multiple);
    }

    #[test]
    fn test_column_with_selector() {
        let mut library = genre_library("test_library_column");
        library.set_sort(vec![SortKey::descending(Field::Length)]);
        let request = PageRequest::default().with_selector(Selector::Exclude([2].into()));
        let values = library.column(&request, Field::Id).unwrap();
        assert_eq!(values, vec![FieldValue::Int(3), FieldValue::Int(1)]);
        assert!(matches!(
            library.column(&request, Field::Resolution),
            Err(CatalogError::ViewError(_))
        ));
    }

    #[test]
    fn test_moves() {
        let mut library = library("test_library_moves");
        library
            .import(vec![
                RecordBuilder::new(1).path("/new/a.mp4").size(100).duration(3600).build(),
                RecordBuilder::new(2).size(100).duration(3600).not_found().build(),
                RecordBuilder::new(3).size(100).duration(3600).not_found().build(),
            ])
            .unwrap();

        let candidates = library.move_candidates(2).unwrap();
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].record_id, 1);
        assert_eq!(library.move_group_id(3).unwrap(), library.move_group_id(1).unwrap());

        assert!(library.apply_move(1, 2).is_err());
        library.apply_move(2, 1).unwrap();
        let moved = library.db().require(2).unwrap();
        assert_eq!(moved.path, Path::new("/new/a.mp4"));
        assert!(moved.flags.found);
        assert!(!library.db().contains(1).unwrap());

        let candidates = library.move_candidates(3).unwrap();
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].record_id, 2);
    }

    #[test]
    fn test_sources_filter() {
        let mut library = library("test_library_sources");
        library
            .import(vec![
                RecordBuilder::new(1).build(),
                RecordBuilder::new(2).unreadable().build(),
            ])
            .unwrap();
        let result = library.view(&PageRequest::default()).unwrap();
        assert_eq!(ids(&result), vec![1]);

        library.set_sources(vec![SourceSegment::Unreadable.into()]);
        let result = library.view(&PageRequest::default()).unwrap();
        assert_eq!(ids(&result), vec![2]);

        library.set_sources(Vec::new());
        assert!(library.view(&PageRequest::default()).unwrap().records.is_empty());
    }
}
