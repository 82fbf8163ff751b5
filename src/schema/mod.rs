//! Typed property catalog
//!
//! This module provides the `PropertyCatalog` type which manages:
//! - **Definitions**: name, value kind, multiplicity, optional enumeration and default
//! - **Validation**: the single boundary every property value passes through before
//!   it reaches a record
//!
//! The catalog never edits records. Every structural mutation returns a
//! [`CatalogChange`] which the store applies to its records.
//!
//! # Examples
//!
//! ```
//! use mediacat::schema::{PropertyCatalog, PropertyKind, PropertyValue};
//!
//! let mut catalog = PropertyCatalog::default();
//! catalog.define("genre", PropertyKind::Str, true, None, None)?;
//!
//! let values = catalog.validate("genre", vec!["rock".into(), "rock".into()])?;
//! assert_eq!(values, vec![PropertyValue::from("rock")]);
//! # Ok::<(), mediacat::schema::SchemaError>(())
//! ```

pub mod error;
pub mod types;

pub use error::{Result, SchemaError};
pub use types::{CatalogChange, PropertyDescription, PropertyKind, PropertyType, PropertyValue};

use std::collections::BTreeMap;
use std::sync::OnceLock;

/// Registry of property definitions keyed by name
#[derive(Debug, Clone, Default)]
pub struct PropertyCatalog {
    types: BTreeMap<String, PropertyType>,
    described: OnceLock<Vec<PropertyDescription>>,
}

impl PropertyCatalog {
    /// Build a catalog from previously persisted definitions
    pub fn from_types(types: impl IntoIterator<Item = PropertyType>) -> Self {
        Self {
            types: types.into_iter().map(|t| (t.name.clone(), t)).collect(),
            described: OnceLock::new(),
        }
    }

    /// Define a new property
    ///
    /// # Errors
    /// Returns `SchemaError::DuplicateTag` if the name is taken, or
    /// `SchemaError::InvalidDefinition` if the definition itself is malformed.
    pub fn define(
        &mut self,
        name: &str,
        kind: PropertyKind,
        multiple: bool,
        enumeration: Option<Vec<PropertyValue>>,
        default: Option<PropertyValue>,
    ) -> Result<CatalogChange> {
        if self.types.contains_key(name.trim()) {
            return Err(SchemaError::DuplicateTag(name.trim().to_string()));
        }
        let definition = PropertyType::new(name, kind, multiple, enumeration, default)?;
        let name = definition.name.clone();
        self.types.insert(name.clone(), definition);
        self.touch();
        Ok(CatalogChange::Defined(name))
    }

    /// Rename a property
    ///
    /// # Errors
    /// Returns `SchemaError::UnknownTag` if `old` is not defined,
    /// `SchemaError::DuplicateTag` if `new` already exists, or
    /// `SchemaError::InvalidDefinition` if `new` is blank.
    pub fn rename(&mut self, old: &str, new: &str) -> Result<CatalogChange> {
        let new = new.trim();
        if !self.types.contains_key(old) {
            return Err(SchemaError::UnknownTag(old.to_string()));
        }
        if new.is_empty() {
            return Err(SchemaError::InvalidDefinition(
                old.to_string(),
                "new name cannot be empty".into(),
            ));
        }
        if self.types.contains_key(new) {
            return Err(SchemaError::DuplicateTag(new.to_string()));
        }
        if let Some(mut definition) = self.types.remove(old) {
            definition.name = new.to_string();
            self.types.insert(new.to_string(), definition);
        }
        self.touch();
        Ok(CatalogChange::Renamed {
            old: old.to_string(),
            new: new.to_string(),
        })
    }

    /// Remove a property definition
    ///
    /// # Errors
    /// Returns `SchemaError::UnknownTag` if the property is not defined.
    pub fn remove(&mut self, name: &str) -> Result<CatalogChange> {
        self.types
            .remove(name)
            .ok_or_else(|| SchemaError::UnknownTag(name.to_string()))?;
        self.touch();
        Ok(CatalogChange::Removed(name.to_string()))
    }

    /// Switch a property between single- and multi-valued
    ///
    /// # Errors
    /// Returns `SchemaError::UnknownTag` if the property is not defined.
    pub fn set_multiplicity(&mut self, name: &str, multiple: bool) -> Result<CatalogChange> {
        let definition = self
            .types
            .get_mut(name)
            .ok_or_else(|| SchemaError::UnknownTag(name.to_string()))?;
        definition.multiple = multiple;
        self.touch();
        Ok(CatalogChange::MultiplicityChanged {
            name: name.to_string(),
            multiple,
        })
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&PropertyType> {
        self.types.get(name)
    }

    /// # Errors
    /// Returns `SchemaError::UnknownTag` if the property is not defined.
    pub fn require(&self, name: &str) -> Result<&PropertyType> {
        self.get(name)
            .ok_or_else(|| SchemaError::UnknownTag(name.to_string()))
    }

    /// Validate raw values for a property
    ///
    /// # Errors
    /// Returns `SchemaError::UnknownTag` or `SchemaError::InvalidTagValue`.
    pub fn validate(&self, name: &str, raw: Vec<PropertyValue>) -> Result<Vec<PropertyValue>> {
        self.require(name)?.validate(raw)
    }

    /// Parse and validate textual values for a property
    ///
    /// # Errors
    /// Returns `SchemaError::UnknownTag` or `SchemaError::InvalidTagValue`.
    pub fn parse<S: AsRef<str>>(&self, name: &str, texts: &[S]) -> Result<Vec<PropertyValue>> {
        self.require(name)?.parse(texts)
    }

    /// # Errors
    /// Returns `SchemaError::UnknownTag` if the property is not defined.
    pub fn describe(&self, name: &str) -> Result<PropertyDescription> {
        Ok(self.require(name)?.describe())
    }

    /// Descriptions of every property, sorted by name
    ///
    /// Computed once and reused until the next catalog mutation.
    pub fn describe_all(&self) -> &[PropertyDescription] {
        self.described
            .get_or_init(|| self.types.values().map(PropertyType::describe).collect())
    }

    pub fn iter(&self) -> impl Iterator<Item = &PropertyType> {
        self.types.values()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    fn touch(&mut self) {
        self.described.take();
    }
}
