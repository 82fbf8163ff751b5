use super::error::{ParamsError, Result};
use super::types::{Layer, ViewParameters};
use crate::grouping::GroupingSpec;
use crate::query::SourcePath;
use crate::schema::{PropertyCatalog, PropertyValue};
use crate::search::SearchSpec;
use crate::view::SortKey;
use std::sync::Arc;

/// A cache that must drop its contents when the view inputs change
pub trait Invalidate: Send + Sync {
    fn invalidate(&self);
}

/// Holds the view layers and enforces their reset rules
///
/// Changes to sources, search, grouping and the classifier path invalidate
/// every subscribed cache before returning. Group and sort changes do not.
#[derive(Default)]
pub struct ParameterStore {
    params: ViewParameters,
    listeners: Vec<Arc<dyn Invalidate>>,
}

impl ParameterStore {
    #[must_use]
    pub fn new(params: ViewParameters) -> Self {
        Self {
            params,
            listeners: Vec::new(),
        }
    }

    pub fn subscribe(&mut self, listener: Arc<dyn Invalidate>) {
        self.listeners.push(listener);
    }

    #[must_use]
    pub const fn params(&self) -> &ViewParameters {
        &self.params
    }

    /// Invalidate every subscribed cache
    pub fn force_update(&self) {
        tracing::debug!(listeners = self.listeners.len(), "invalidating view caches");
        for listener in &self.listeners {
            listener.invalidate();
        }
    }

    pub fn set_sources(&mut self, sources: Vec<SourcePath>) {
        if self.params.sources != sources {
            self.params.sources = sources;
            self.params.group_id = 0;
            self.force_update();
        }
    }

    /// Blank search text clears the search layer
    pub fn set_search(&mut self, search: Option<SearchSpec>) {
        let search = search.filter(|s| !s.is_blank());
        if self.params.search != search {
            self.params.search = search;
            self.params.group_id = 0;
            self.force_update();
        }
    }

    pub fn set_grouping(&mut self, grouping: Option<GroupingSpec>) {
        if self.params.grouping != grouping {
            self.params.grouping = grouping;
            self.params.classifier.clear();
            self.params.group_id = 0;
            self.force_update();
        }
    }

    /// Drill one level deeper into a multi-valued property grouping
    ///
    /// # Errors
    /// Returns `ParamsError::NoGrouping` or `ParamsError::NotMultiValued` when the
    /// active grouping cannot be drilled, `ParamsError::Schema` if the value is
    /// invalid for the property, or `ParamsError::DuplicateClassifierValue`.
    pub fn classifier_push(&mut self, value: PropertyValue, catalog: &PropertyCatalog) -> Result<()> {
        let property = self.classified_property(catalog)?;
        let mut validated = catalog.validate(&property, vec![value])?;
        let Some(value) = validated.pop() else {
            return Ok(());
        };
        if self.params.classifier.contains(&value) {
            return Err(ParamsError::DuplicateClassifierValue(value.to_string()));
        }
        self.params.classifier.push(value);
        self.params.group_id = 0;
        self.force_update();
        Ok(())
    }

    /// Replace the whole classifier path
    ///
    /// # Errors
    /// Same conditions as [`Self::classifier_push`], checked for every value
    /// before the path changes.
    pub fn set_classifier(&mut self, path: Vec<PropertyValue>, catalog: &PropertyCatalog) -> Result<()> {
        if path.is_empty() {
            self.classifier_reset();
            return Ok(());
        }
        let property = self.classified_property(catalog)?;
        let mut validated: Vec<PropertyValue> = Vec::with_capacity(path.len());
        for value in path {
            for value in catalog.validate(&property, vec![value])? {
                if validated.contains(&value) {
                    return Err(ParamsError::DuplicateClassifierValue(value.to_string()));
                }
                validated.push(value);
            }
        }
        if self.params.classifier != validated {
            self.params.classifier = validated;
            self.params.group_id = 0;
            self.force_update();
        }
        Ok(())
    }

    pub fn classifier_pop(&mut self) -> Option<PropertyValue> {
        let popped = self.params.classifier.pop();
        if popped.is_some() {
            self.params.group_id = 0;
            self.force_update();
        }
        popped
    }

    pub fn classifier_reset(&mut self) {
        if !self.params.classifier.is_empty() {
            self.params.classifier.clear();
            self.params.group_id = 0;
            self.force_update();
        }
    }

    pub const fn set_group(&mut self, group_id: usize) {
        self.params.group_id = group_id;
    }

    /// Clamp the selected group into `[0, group_count - 1]`, 0 without groups
    pub fn clamp_group(&mut self, group_count: usize) -> usize {
        let clamped = self.params.group_id.min(group_count.saturating_sub(1));
        if clamped != self.params.group_id {
            tracing::warn!(requested = self.params.group_id, clamped, "group index clamped");
            self.params.group_id = clamped;
        }
        clamped
    }

    pub fn set_sort(&mut self, sort: Vec<SortKey>) {
        self.params.sort = sort;
    }

    /// Restore one layer to its default
    ///
    /// Resetting the grouping also resets the classifier path and group.
    pub fn reset(&mut self, layer: Layer) {
        match layer {
            Layer::Sources => self.set_sources(ViewParameters::default_sources()),
            Layer::Grouping => self.set_grouping(None),
            Layer::Classifier => self.classifier_reset(),
            Layer::Group => self.params.group_id = 0,
            Layer::Search => self.set_search(None),
            Layer::Sort => self.params.sort = ViewParameters::default_sort(),
        }
    }

    /// Report that a field or property changed on some records
    ///
    /// Returns true when it matches the active grouping, in which case caches are
    /// invalidated.
    pub fn notify_modified(&self, name: &str, is_property: bool) -> bool {
        let affected = self
            .params
            .grouping
            .as_ref()
            .is_some_and(|g| g.field == name && g.is_property == is_property);
        if affected {
            self.force_update();
        }
        affected
    }

    /// Follow a property rename when it is the grouping property
    pub fn rename_grouping_property(&mut self, old: &str, new: &str) {
        if let Some(grouping) = self.params.grouping.as_mut()
            && grouping.is_property
            && grouping.field == old
        {
            grouping.field = new.to_string();
            self.force_update();
        }
    }

    fn classified_property(&self, catalog: &PropertyCatalog) -> Result<String> {
        let grouping = self.params.grouping.as_ref().ok_or(ParamsError::NoGrouping)?;
        let multiple = grouping.is_property
            && catalog
                .get(&grouping.field)
                .is_some_and(|property| property.multiple);
        if !multiple {
            return Err(ParamsError::NotMultiValued(grouping.field.clone()));
        }
        Ok(grouping.field.clone())
    }
}
