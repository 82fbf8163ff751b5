//! Record store for mediacat
//!
//! Provides a clean API for storing media records and their property values
//! using sled as the embedded database backend.
//!
//! Uses multiple sled trees for efficient indexing:
//! - `records`: record id -> bincode `Record`
//! - `tags`: reverse index `(property, value)` -> record ids
//! - `terms`: reverse index search term -> record ids
//! - `properties`: property name -> bincode `PropertyType`
//! - `meta`: identifier counter

use crate::record::{Record, RecordId};
use crate::schema::{CatalogChange, PropertyType, PropertyValue, SchemaError};
use crate::search::{self, SearchIndex, SearchMode};
use sled::{Db, Tree};
use std::collections::BTreeSet;
use std::path::Path;

pub mod error;
pub mod query;
pub mod types;

pub use error::{DbError, Result};
pub use query::QueryPlan;
pub use types::{IdList, RecordKey, TagKey};

const NEXT_ID: &[u8] = b"next_id";

/// Database wrapper that encapsulates all store operations
///
/// Every write keeps the `tags` and `terms` reverse indices in step with the
/// `records` tree.
pub struct Database {
    db: Db,
    records: Tree,
    tags: Tree,
    terms: Tree,
    properties: Tree,
    meta: Tree,
}

impl Database {
    /// Opens or creates a database at the specified path
    ///
    /// # Examples
    /// ```no_run
    /// use mediacat::db::Database;
    /// let db = Database::open("my_db").unwrap();
    /// ```
    ///
    /// # Errors
    ///
    /// Returns `DbError` if the database cannot be opened or if the internal trees cannot be created.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let db = sled::open(path)?;
        let records = db.open_tree("records")?;
        let tags = db.open_tree("tags")?;
        let terms = db.open_tree("terms")?;
        let properties = db.open_tree("properties")?;
        let meta = db.open_tree("meta")?;
        Ok(Self {
            db,
            records,
            tags,
            terms,
            properties,
            meta,
        })
    }

    /// Insert or replace a record
    ///
    /// A record with id 0 gets the next free identifier. Property values are
    /// stored as given; validation against the catalog is the caller's job.
    ///
    /// # Errors
    ///
    /// Returns `DbError` if database operations fail or serialization errors occur.
    pub fn insert(&self, mut record: Record) -> Result<RecordId> {
        if record.path.as_os_str().is_empty() {
            return Err(DbError::InvalidInput("record path is empty".into()));
        }
        if record.id == 0 {
            record.id = self.next_id()?;
        } else {
            self.reserve_id(record.id)?;
        }

        if let Some(old) = self.get(record.id)? {
            self.unindex_record(&old)?;
        }

        let value = bincode::encode_to_vec(&record, bincode::config::standard())?;
        self.records.insert(RecordKey(record.id).to_bytes(), value)?;
        self.index_record(&record)?;

        Ok(record.id)
    }

    /// # Errors
    ///
    /// Returns `DbError` if database operations fail or deserialization errors occur.
    pub fn get(&self, id: RecordId) -> Result<Option<Record>> {
        self.records
            .get(RecordKey(id).to_bytes())?
            .map(|value| decode_record(&value))
            .transpose()
    }

    /// # Errors
    ///
    /// Returns `DbError::RecordNotFound` if no record has this identifier.
    pub fn require(&self, id: RecordId) -> Result<Record> {
        self.get(id)?.ok_or(DbError::RecordNotFound(id))
    }

    /// Remove a record and its index entries
    ///
    /// # Errors
    ///
    /// Returns `DbError` if database operations fail.
    pub fn remove(&self, id: RecordId) -> Result<bool> {
        let Some(record) = self.get(id)? else {
            return Ok(false);
        };
        self.unindex_record(&record)?;
        Ok(self.records.remove(RecordKey(id).to_bytes())?.is_some())
    }

    /// All records in identifier order
    ///
    /// # Errors
    ///
    /// Returns `DbError` if database iteration fails or deserialization errors occur.
    pub fn list_all(&self) -> Result<Vec<Record>> {
        let mut records = Vec::with_capacity(self.records.len());
        for result in &self.records {
            let (_, value) = result?;
            records.push(decode_record(&value)?);
        }
        Ok(records)
    }

    /// Get the number of records in the database
    #[must_use]
    pub fn count(&self) -> usize {
        self.records.len()
    }

    /// # Errors
    ///
    /// Returns `DbError` if database operations fail.
    pub fn contains(&self, id: RecordId) -> Result<bool> {
        Ok(self.records.contains_key(RecordKey(id).to_bytes())?)
    }

    /// Records holding `value` for `property` (reverse index lookup)
    ///
    /// # Errors
    ///
    /// Returns `DbError` if database operations fail or deserialization errors occur.
    pub fn find_by_tag(&self, property: &str, value: &PropertyValue) -> Result<BTreeSet<RecordId>> {
        let key = TagKey::new(property, value).to_bytes()?;
        read_ids(&self.tags, &key)
    }

    /// Records holding every value in `values` (intersection of index entries)
    ///
    /// An empty value list matches nothing.
    ///
    /// # Errors
    ///
    /// Returns `DbError` if any lookup fails.
    pub fn find_by_all_values(
        &self,
        property: &str,
        values: &[PropertyValue],
    ) -> Result<BTreeSet<RecordId>> {
        let hits = values
            .iter()
            .map(|value| self.find_by_tag(property, value))
            .collect::<Result<Vec<_>>>()?;
        Ok(search::combine(hits, SearchMode::All))
    }

    /// Records holding at least one value for `property`
    ///
    /// # Errors
    ///
    /// Returns `DbError` if database iteration fails or deserialization errors occur.
    pub fn find_with_property(&self, property: &str) -> Result<BTreeSet<RecordId>> {
        let mut ids = BTreeSet::new();
        for result in self.tags.scan_prefix(TagKey::prefix(property)?) {
            let (_, value) = result?;
            ids.extend(IdList::from_bytes(&value)?.0);
        }
        Ok(ids)
    }

    /// Distinct values of `property` with the number of records holding each
    ///
    /// # Errors
    ///
    /// Returns `DbError` if database iteration fails or deserialization errors occur.
    pub fn property_values(&self, property: &str) -> Result<Vec<(PropertyValue, usize)>> {
        let mut values = Vec::new();
        for result in self.tags.scan_prefix(TagKey::prefix(property)?) {
            let (key, value) = result?;
            let (_, property_value) = TagKey::decode(&key)?;
            values.push((property_value, IdList::from_bytes(&value)?.0.len()));
        }
        values.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(values)
    }

    /// Records whose search text contains `term`
    ///
    /// # Errors
    ///
    /// Returns `DbError` if database operations fail or deserialization errors occur.
    pub fn find_by_term(&self, term: &str) -> Result<BTreeSet<RecordId>> {
        read_ids(&self.terms, term.as_bytes())
    }

    /// Replace the values of `property` on several records
    ///
    /// Returns the number of distinct records rewritten.
    /// Every record is loaded before anything is written, so an unknown
    /// identifier leaves the store untouched.
    ///
    /// # Errors
    ///
    /// Returns `DbError::RecordNotFound` for an unknown identifier, or `DbError` if
    /// database operations fail.
    pub fn set_property_values(
        &self,
        ids: &[RecordId],
        property: &str,
        values: &[PropertyValue],
    ) -> Result<usize> {
        let ids: BTreeSet<RecordId> = ids.iter().copied().collect();
        let records = ids
            .iter()
            .map(|&id| self.require(id))
            .collect::<Result<Vec<_>>>()?;
        for mut record in records {
            record.set_values(property, values.to_vec());
            self.insert(record)?;
        }
        Ok(ids.len())
    }

    /// Apply a catalog change to every stored record
    ///
    /// Returns the number of records rewritten. Making a property single-valued is
    /// refused while any record holds more than one value for it.
    ///
    /// # Errors
    ///
    /// Returns `DbError::Schema` for a refused multiplicity change, or `DbError` if
    /// database operations fail.
    pub fn apply_catalog_change(&self, change: &CatalogChange) -> Result<usize> {
        match change {
            CatalogChange::Defined(_) | CatalogChange::MultiplicityChanged { multiple: true, .. } => {
                Ok(0)
            }
            CatalogChange::MultiplicityChanged {
                name,
                multiple: false,
            } => {
                let most = self.max_value_count(name)?;
                if most > 1 {
                    return Err(SchemaError::InvalidTagValue {
                        tag: name.clone(),
                        value: format!("{most} values"),
                        reason: "some records hold several values".into(),
                    }
                    .into());
                }
                Ok(0)
            }
            CatalogChange::Renamed { old, new } => self.rewrite_property(old, |record| {
                let values = record.properties.remove(old).unwrap_or_default();
                record.set_values(new, values);
            }),
            CatalogChange::Removed(name) => self.rewrite_property(name, |record| {
                record.properties.remove(name);
            }),
        }
    }

    /// Largest number of values any record holds for `property`
    ///
    /// # Errors
    ///
    /// Returns `DbError` if database operations fail.
    pub fn max_value_count(&self, property: &str) -> Result<usize> {
        let mut most = 0;
        for id in self.find_with_property(property)? {
            most = most.max(self.require(id)?.values(property).len());
        }
        Ok(most)
    }

    /// # Errors
    ///
    /// Returns `DbError` if database operations fail or serialization errors occur.
    pub fn save_property(&self, property: &PropertyType) -> Result<()> {
        let value = bincode::encode_to_vec(property, bincode::config::standard())?;
        self.properties.insert(property.name.as_bytes(), value)?;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `DbError` if database operations fail.
    pub fn delete_property(&self, name: &str) -> Result<bool> {
        Ok(self.properties.remove(name.as_bytes())?.is_some())
    }

    /// All persisted property definitions
    ///
    /// # Errors
    ///
    /// Returns `DbError` if database iteration fails or deserialization errors occur.
    pub fn load_properties(&self) -> Result<Vec<PropertyType>> {
        let mut properties = Vec::new();
        for result in &self.properties {
            let (_, value) = result?;
            let (property, _): (PropertyType, usize) =
                bincode::decode_from_slice(&value, bincode::config::standard())?;
            properties.push(property);
        }
        Ok(properties)
    }

    /// Flush all pending writes to disk
    ///
    /// # Errors
    ///
    /// Returns `DbError` if the flush operation fails.
    pub fn flush(&self) -> Result<()> {
        self.db.flush()?;
        Ok(())
    }

    /// Clear all records, indices and property definitions
    ///
    /// # Warning
    /// This operation is irreversible!
    ///
    /// # Errors
    ///
    /// Returns `DbError` if clearing any tree fails.
    pub fn clear(&self) -> Result<()> {
        self.records.clear()?;
        self.tags.clear()?;
        self.terms.clear()?;
        self.properties.clear()?;
        self.meta.clear()?;
        Ok(())
    }

    fn rewrite_property(&self, property: &str, edit: impl Fn(&mut Record)) -> Result<usize> {
        let records = self
            .find_with_property(property)?
            .into_iter()
            .map(|id| self.require(id))
            .collect::<Result<Vec<_>>>()?;
        let rewritten = records.len();
        for mut record in records {
            edit(&mut record);
            self.insert(record)?;
        }
        Ok(rewritten)
    }

    fn next_id(&self) -> Result<RecordId> {
        let next = self.stored_next_id()?;
        self.meta.insert(NEXT_ID, RecordKey(successor(next)?).to_bytes().to_vec())?;
        Ok(next)
    }

    fn reserve_id(&self, id: RecordId) -> Result<()> {
        if id >= self.stored_next_id()? {
            self.meta.insert(NEXT_ID, RecordKey(successor(id)?).to_bytes().to_vec())?;
        }
        Ok(())
    }

    fn stored_next_id(&self) -> Result<RecordId> {
        match self.meta.get(NEXT_ID)? {
            Some(bytes) => Ok(RecordKey::from_bytes(&bytes)?.0),
            None => Ok(1),
        }
    }

    // Private helpers for managing the reverse indices

    fn index_record(&self, record: &Record) -> Result<()> {
        for (property, values) in &record.properties {
            for value in values {
                add_to_index(&self.tags, &TagKey::new(property, value).to_bytes()?, record.id)?;
            }
        }
        for term in search::tokenize(&record.search_text()) {
            add_to_index(&self.terms, term.as_bytes(), record.id)?;
        }
        Ok(())
    }

    fn unindex_record(&self, record: &Record) -> Result<()> {
        for (property, values) in &record.properties {
            for value in values {
                remove_from_index(&self.tags, &TagKey::new(property, value).to_bytes()?, record.id)?;
            }
        }
        for term in search::tokenize(&record.search_text()) {
            remove_from_index(&self.terms, term.as_bytes(), record.id)?;
        }
        Ok(())
    }
}

impl SearchIndex for Database {
    fn lookup(&self, terms: &[String], mode: SearchMode) -> Result<BTreeSet<RecordId>> {
        let hits = terms
            .iter()
            .map(|term| self.find_by_term(term))
            .collect::<Result<Vec<_>>>()?;
        Ok(search::combine(hits, mode))
    }
}

impl Drop for Database {
    fn drop(&mut self) {
        // Best-effort flush on drop. Callers should explicitly flush()
        // if they need guaranteed durability.
        let _ = self.db.flush();
    }
}

fn successor(id: RecordId) -> Result<RecordId> {
    id.checked_add(1)
        .ok_or_else(|| DbError::InvalidInput(format!("record id {id} is out of range")))
}

fn decode_record(bytes: &[u8]) -> Result<Record> {
    let (record, _): (Record, usize) = bincode::decode_from_slice(bytes, bincode::config::standard())?;
    Ok(record)
}

fn read_ids(tree: &Tree, key: &[u8]) -> Result<BTreeSet<RecordId>> {
    match tree.get(key)? {
        Some(value) => Ok(IdList::from_bytes(&value)?.0.into_iter().collect()),
        None => Ok(BTreeSet::new()),
    }
}

/// Add an id under `key`, creating the entry if needed
fn add_to_index(tree: &Tree, key: &[u8], id: RecordId) -> Result<()> {
    let mut ids = match tree.get(key)? {
        Some(value) => IdList::from_bytes(&value)?,
        None => IdList::default(),
    };
    if ids.insert(id) {
        tree.insert(key, ids.to_bytes()?)?;
    }
    Ok(())
}

/// Remove an id from `key`, dropping the entry once it is empty
fn remove_from_index(tree: &Tree, key: &[u8], id: RecordId) -> Result<()> {
    if let Some(value) = tree.get(key)? {
        let mut ids = IdList::from_bytes(&value)?;
        if !ids.remove(id) {
            return Ok(());
        }
        if ids.is_empty() {
            tree.remove(key)?;
        } else {
            tree.insert(key, ids.to_bytes()?)?;
        }
    }
    Ok(())
}
