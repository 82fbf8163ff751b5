use super::types::{Group, GroupSort, GroupValue, GroupingSpec};
use crate::params::Invalidate;
use crate::query::{QueryError, SourcePath};
use crate::record::{Field, Record, RecordId};
use crate::schema::{PropertyCatalog, PropertyValue};
use crate::search::SearchSpec;
use moka::sync::Cache;
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};

/// Bucket key where an absent value orders after every present one
#[derive(Debug, Clone, PartialEq, Eq)]
struct BucketKey(Option<GroupValue>);

impl Ord for BucketKey {
    fn cmp(&self, other: &Self) -> Ordering {
        match (&self.0, &other.0) {
            (Some(a), Some(b)) => a.cmp(b),
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Greater,
            (Some(_), None) => Ordering::Less,
        }
    }
}

impl PartialOrd for BucketKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[derive(Default)]
struct Bucket {
    ids: Vec<RecordId>,
    length: f64,
}

impl Bucket {
    fn push(&mut self, record: &Record) {
        self.ids.push(record.id);
        self.length += record.length_seconds();
    }
}

/// Partition `records` into the buckets of `grouping`
///
/// `records` must already be filtered by sources and search, in identifier
/// order. A non-empty `classifier` restricts a multi-valued property grouping
/// to records holding every path value and prepends the synthetic
/// already-classified bucket.
///
/// # Errors
/// Returns `QueryError::UnknownField` for an unknown grouping field, or
/// `QueryError::Schema` for an undefined grouping property.
pub fn compute_groups(
    records: &[Record],
    grouping: &GroupingSpec,
    catalog: &PropertyCatalog,
    classifier: &[PropertyValue],
) -> Result<Vec<Group>, QueryError> {
    let mut buckets: BTreeMap<BucketKey, Bucket> = BTreeMap::new();
    let mut classified: Option<Bucket> = None;

    if grouping.is_property {
        let property = catalog.require(&grouping.field)?;
        let name = property.name.as_str();

        if property.multiple {
            if !classifier.is_empty() {
                classified = Some(Bucket::default());
            }
            for record in records {
                let values = record.values(name);
                if !classifier.iter().all(|v| values.contains(v)) {
                    continue;
                }
                if let Some(bucket) = classified.as_mut() {
                    bucket.push(record);
                }
                let remaining: BTreeSet<&PropertyValue> =
                    values.iter().filter(|v| !classifier.contains(v)).collect();
                if remaining.is_empty() {
                    if classifier.is_empty() {
                        buckets.entry(BucketKey(None)).or_default().push(record);
                    }
                    continue;
                }
                for value in remaining {
                    let key = BucketKey(Some(GroupValue::Property(value.clone())));
                    buckets.entry(key).or_default().push(record);
                }
            }
        } else {
            for record in records {
                let value = record
                    .values(name)
                    .first()
                    .unwrap_or(&property.default)
                    .clone();
                let key = BucketKey(Some(GroupValue::Property(value)));
                buckets.entry(key).or_default().push(record);
            }
        }
    } else {
        let field = Field::parse(&grouping.field)
            .ok_or_else(|| QueryError::UnknownField(grouping.field.clone()))?;
        for record in records {
            let key = BucketKey(Some(GroupValue::Field(field.value_of(record))));
            buckets.entry(key).or_default().push(record);
        }
    }

    let mut groups: Vec<(BucketKey, Bucket)> = buckets
        .into_iter()
        .filter(|(_, bucket)| grouping.allow_singletons || bucket.ids.len() > 1)
        .collect();

    match grouping.sorting {
        GroupSort::ByValue => {}
        GroupSort::ByCount => groups.sort_by(|(ka, a), (kb, b)| {
            a.ids.len().cmp(&b.ids.len()).then_with(|| ka.cmp(kb))
        }),
        GroupSort::ByLength => groups.sort_by(|(ka, a), (kb, b)| {
            a.length.total_cmp(&b.length).then_with(|| ka.cmp(kb))
        }),
    }
    if grouping.reverse {
        groups.reverse();
    }

    let mut result = Vec::with_capacity(groups.len() + 1);
    if let Some(bucket) = classified {
        result.push(Group {
            value: None,
            classified: true,
            ids: bucket.ids,
            length: bucket.length,
        });
    }
    result.extend(groups.into_iter().map(|(key, bucket)| Group {
        value: key.0,
        classified: false,
        ids: bucket.ids,
        length: bucket.length,
    }));
    Ok(result)
}

/// Everything a grouping result depends on
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GroupingKey {
    pub sources: Vec<SourcePath>,
    pub search: Option<SearchSpec>,
    pub grouping: GroupingSpec,
    pub classifier: Vec<PropertyValue>,
}

/// Memoizes grouping results until the next invalidation
///
/// Entries are keyed by generation, so nothing computed before an
/// `invalidate()` is served after it, even before moka evicts it.
pub struct GroupingEngine {
    cache: Cache<(u64, GroupingKey), Arc<Vec<Group>>>,
    generation: AtomicU64,
}

impl GroupingEngine {
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(64)
    }

    #[must_use]
    pub fn with_capacity(max_capacity: u64) -> Self {
        Self {
            cache: Cache::builder().max_capacity(max_capacity).build(),
            generation: AtomicU64::new(0),
        }
    }

    /// Cached groups for `key`, computed on a miss
    ///
    /// # Errors
    /// Propagates the error of `compute`; failures are not cached.
    pub fn groups_with<F>(&self, key: &GroupingKey, compute: F) -> Result<Arc<Vec<Group>>, QueryError>
    where
        F: FnOnce() -> Result<Vec<Group>, QueryError>,
    {
        let entry = (self.generation.load(AtomicOrdering::Acquire), key.clone());
        if let Some(groups) = self.cache.get(&entry) {
            return Ok(groups);
        }
        tracing::debug!(field = %key.grouping.field, "grouping cache miss");
        let groups = Arc::new(compute()?);
        self.cache.insert(entry, Arc::clone(&groups));
        Ok(groups)
    }

    /// Whether a result for `key` is currently memoized
    #[must_use]
    pub fn is_cached(&self, key: &GroupingKey) -> bool {
        let generation = self.generation.load(AtomicOrdering::Acquire);
        self.cache.contains_key(&(generation, key.clone()))
    }
}

impl Default for GroupingEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl Invalidate for GroupingEngine {
    fn invalidate(&self) {
        self.generation.fetch_add(1, AtomicOrdering::AcqRel);
        self.cache.invalidate_all();
    }
}
