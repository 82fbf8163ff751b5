//! Moved-file detection
//!
//! A record whose file went missing is probably the same video as a found
//! record with identical size and duration. [`MoveIndex`] clusters readable
//! records by [`MoveFingerprint`] and pairs each missing record with the found
//! records of its cluster. [`MoveDetector`] memoizes the index until the next
//! invalidation.

use crate::params::Invalidate;
use crate::record::{Record, RecordId};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::sync::{Arc, PoisonError, RwLock};

/// Identity used to match a missing file with its new location
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MoveFingerprint {
    pub size: u64,
    pub duration: u64,
    pub duration_time_base: u64,
}

impl MoveFingerprint {
    #[must_use]
    pub const fn of(record: &Record) -> Self {
        Self {
            size: record.size,
            duration: record.duration,
            duration_time_base: record.duration_time_base,
        }
    }
}

impl fmt::Display for MoveFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}/{}", self.size, self.duration, self.duration_time_base)
    }
}

/// A found record a missing one may have moved to
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveDestination {
    pub record_id: RecordId,
    pub path: PathBuf,
}

#[derive(Debug, Default)]
struct Cluster<'a> {
    missing: Vec<&'a Record>,
    found: Vec<&'a Record>,
}

/// Move candidates of one database snapshot
#[derive(Debug, Default, PartialEq)]
pub struct MoveIndex {
    destinations: BTreeMap<RecordId, Vec<MoveDestination>>,
    labels: BTreeMap<RecordId, String>,
}

impl MoveIndex {
    /// Cluster `records`, ignoring unreadable ones
    #[must_use]
    pub fn build(records: &[Record]) -> Self {
        let mut clusters: BTreeMap<MoveFingerprint, Cluster<'_>> = BTreeMap::new();
        for record in records.iter().filter(|r| r.flags.readable) {
            let cluster = clusters.entry(MoveFingerprint::of(record)).or_default();
            if record.flags.found {
                cluster.found.push(record);
            } else {
                cluster.missing.push(record);
            }
        }

        let mut index = Self::default();
        for (fingerprint, mut cluster) in clusters {
            if cluster.missing.is_empty() || cluster.found.is_empty() {
                continue;
            }
            cluster.found.sort_by_key(|r| r.id);
            let label = fingerprint.to_string();
            let destinations: Vec<MoveDestination> = cluster
                .found
                .iter()
                .map(|r| MoveDestination {
                    record_id: r.id,
                    path: r.path.clone(),
                })
                .collect();

            for record in &cluster.missing {
                index.destinations.insert(record.id, destinations.clone());
            }
            for record in cluster.missing.iter().chain(&cluster.found) {
                index.labels.insert(record.id, label.clone());
            }
        }

        tracing::debug!(
            missing = index.destinations.len(),
            grouped = index.labels.len(),
            "built move index"
        );
        index
    }

    /// Found records a missing record may have moved to, by ascending id
    ///
    /// Empty for found records and records without a candidate.
    #[must_use]
    pub fn candidates(&self, id: RecordId) -> &[MoveDestination] {
        self.destinations
            .get(&id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Label shared by every record of a qualifying cluster
    #[must_use]
    pub fn move_group_id(&self, id: RecordId) -> Option<&str> {
        self.labels.get(&id).map(String::as_str)
    }

    /// Every missing record with its destinations
    #[must_use]
    pub const fn all(&self) -> &BTreeMap<RecordId, Vec<MoveDestination>> {
        &self.destinations
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.destinations.is_empty()
    }
}

/// Lazily built, invalidatable [`MoveIndex`]
#[derive(Debug, Default)]
pub struct MoveDetector {
    index: RwLock<Option<Arc<MoveIndex>>>,
}

impl MoveDetector {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The memoized index, built from `load` on first use
    ///
    /// # Errors
    /// Propagates the error of `load`; nothing is memoized then.
    pub fn index_with<F, E>(&self, load: F) -> Result<Arc<MoveIndex>, E>
    where
        F: FnOnce() -> Result<Vec<Record>, E>,
    {
        if let Some(index) = self
            .index
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
        {
            return Ok(Arc::clone(index));
        }

        let index = Arc::new(MoveIndex::build(&load()?));
        *self.index.write().unwrap_or_else(PoisonError::into_inner) = Some(Arc::clone(&index));
        Ok(index)
    }

    #[must_use]
    pub fn is_built(&self) -> bool {
        self.index
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }
}

impl Invalidate for MoveDetector {
    fn invalidate(&self) {
        *self.index.write().unwrap_or_else(PoisonError::into_inner) = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RecordBuilder;

    fn record(id: RecordId, size: u64, seconds: u64) -> RecordBuilder {
        RecordBuilder::new(id).size(size).duration(seconds)
    }

    #[test]
    fn test_missing_records_share_destination() {
        let records = vec![
            record(1, 100, 3600).build(),
            record(2, 100, 3600).not_found().build(),
            record(3, 100, 3600).not_found().build(),
        ];
        let index = MoveIndex::build(&records);

        assert_eq!(index.all().len(), 2);
        for id in [2, 3] {
            let ids: Vec<_> = index.candidates(id).iter().map(|d| d.record_id).collect();
            assert_eq!(ids, vec![1]);
        }
        assert!(index.candidates(1).is_empty());

        let label = index.move_group_id(1).unwrap();
        assert_eq!(label, "100, 3600/1");
        assert_eq!(index.move_group_id(2), Some(label));
        assert_eq!(index.move_group_id(3), Some(label));
    }

    #[test]
    fn test_destinations_ordered_by_id() {
        let records = vec![
            record(9, 5, 10).build(),
            record(4, 5, 10).not_found().build(),
            record(2, 5, 10).build(),
        ];
        let index = MoveIndex::build(&records);
        let ids: Vec<_> = index.candidates(4).iter().map(|d| d.record_id).collect();
        assert_eq!(ids, vec![2, 9]);
        assert_eq!(index.candidates(4)[0].path, PathBuf::from("/media/video-2.mp4"));
    }

    #[test]
    fn test_unqualified_clusters_are_ignored() {
        let records = vec![
            record(1, 100, 60).build(),
            record(2, 100, 60).build(),
            record(3, 200, 60).not_found().build(),
            record(4, 300, 60).not_found().build(),
            record(5, 300, 60).unreadable().build(),
        ];
        let index = MoveIndex::build(&records);
        assert!(index.is_empty());
        assert_eq!(index.move_group_id(1), None);
        assert_eq!(index.move_group_id(5), None);
    }

    #[test]
    fn test_time_base_is_part_of_fingerprint() {
        let records = vec![
            RecordBuilder::new(1).size(10).build().with_duration(3600, 1),
            RecordBuilder::new(2).size(10).not_found().build().with_duration(3600, 1000),
        ];
        assert!(MoveIndex::build(&records).is_empty());
    }

    #[test]
    fn test_symmetry() {
        let records = vec![
            record(1, 1, 1).build(),
            record(2, 1, 1).not_found().build(),
            record(3, 2, 2).build(),
            record(4, 2, 2).build(),
            record(5, 2, 2).not_found().build(),
        ];
        let index = MoveIndex::build(&records);
        for (source, destinations) in index.all() {
            for destination in destinations {
                assert_eq!(
                    index.move_group_id(destination.record_id),
                    index.move_group_id(*source)
                );
                assert!(index.candidates(destination.record_id).is_empty());
            }
        }
    }

    #[test]
    fn test_detector_memoizes_until_invalidated() {
        let detector = MoveDetector::new();
        let mut loads = 0;
        let mut load = || -> Result<Vec<Record>, ()> {
            loads += 1;
            Ok(vec![record(1, 1, 1).build(), record(2, 1, 1).not_found().build()])
        };

        let first = detector.index_with(&mut load).unwrap();
        let second = detector.index_with(&mut load).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert!(detector.is_built());

        detector.invalidate();
        assert!(!detector.is_built());
        detector.index_with(&mut load).unwrap();
        assert_eq!(loads, 2);
    }

    #[test]
    fn test_failed_load_is_not_memoized() {
        let detector = MoveDetector::new();
        assert_eq!(detector.index_with(|| Err::<Vec<Record>, _>("io")), Err("io"));
        assert!(!detector.is_built());
    }
}
