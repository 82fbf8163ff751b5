//! Testing utilities for mediacat
//!
//! Provides a `TestDb` wrapper for temporary database management and a
//! `RecordBuilder` for terse record fixtures.
//!
//! Only available when compiled with `cfg(test)`.

use crate::db::Database;
use crate::library::Library;
use crate::params::ViewParameters;
use crate::record::{Record, RecordId};
use crate::schema::PropertyValue;
use std::ops::{Deref, DerefMut};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn scratch_dir() -> TempDir {
    tempfile::Builder::new()
        .prefix("mediacat-test-")
        .tempdir()
        .expect("Failed to create temporary directory")
}

/// Temporary database living in its own directory
///
/// The directory is removed when the wrapper goes out of scope.
pub struct TestDb {
    // Field order matters: the database must close before its directory goes.
    db: Database,
    path: PathBuf,
    _dir: TempDir,
}

impl TestDb {
    /// Open a fresh database named `name` inside a temporary directory
    ///
    /// # Panics
    /// Panics if the directory or the database cannot be created.
    pub fn new(name: &str) -> Self {
        let dir = scratch_dir();
        let path = dir.path().join(name);
        let db = Database::open(&path).expect("Failed to open test database");
        Self { db, path, _dir: dir }
    }

    #[must_use]
    pub const fn db(&self) -> &Database {
        &self.db
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Library over a temporary database with default view parameters
pub struct TestLibrary {
    library: Library,
    _dir: TempDir,
}

impl TestLibrary {
    /// # Panics
    /// Panics if the directory or the database cannot be created.
    pub fn new(name: &str) -> Self {
        let dir = scratch_dir();
        let db = Database::open(dir.path().join(name)).expect("Failed to open test database");
        let library = Library::with_params(db, ViewParameters::default())
            .expect("Failed to open test library");
        Self { library, _dir: dir }
    }
}

impl Deref for TestLibrary {
    type Target = Library;

    fn deref(&self) -> &Library {
        &self.library
    }
}

impl DerefMut for TestLibrary {
    fn deref_mut(&mut self) -> &mut Library {
        &mut self.library
    }
}

/// Builder for records with a fixed identifier
pub struct RecordBuilder {
    record: Record,
}

impl RecordBuilder {
    #[must_use]
    pub fn new(id: RecordId) -> Self {
        Self {
            record: Record::new(format!("/media/video-{id}.mp4")).with_id(id),
        }
    }

    #[must_use]
    pub fn path(mut self, path: &str) -> Self {
        self.record.path = PathBuf::from(path);
        self
    }

    #[must_use]
    pub fn title(mut self, title: &str) -> Self {
        self.record.title = title.to_string();
        self
    }

    /// String values of a property
    #[must_use]
    pub fn values(mut self, property: &str, values: &[&str]) -> Self {
        self.record.set_values(
            property,
            values.iter().map(|v| PropertyValue::from(*v)).collect(),
        );
        self
    }

    #[must_use]
    pub fn value(mut self, property: &str, value: PropertyValue) -> Self {
        self.record.set_values(property, vec![value]);
        self
    }

    #[must_use]
    pub const fn size(mut self, size: u64) -> Self {
        self.record.size = size;
        self
    }

    /// Duration in whole seconds
    #[must_use]
    pub const fn duration(mut self, seconds: u64) -> Self {
        self.record.duration = seconds;
        self.record.duration_time_base = 1;
        self
    }

    #[must_use]
    pub const fn date(mut self, date: i64) -> Self {
        self.record.date = date;
        self
    }

    #[must_use]
    pub const fn resolution(mut self, width: u32, height: u32) -> Self {
        self.record.width = width;
        self.record.height = height;
        self
    }

    #[must_use]
    pub const fn not_found(mut self) -> Self {
        self.record.flags.found = false;
        self
    }

    #[must_use]
    pub const fn unreadable(mut self) -> Self {
        self.record.flags.readable = false;
        self
    }

    #[must_use]
    pub const fn watched(mut self) -> Self {
        self.record.flags.watched = true;
        self
    }

    #[must_use]
    pub fn build(self) -> Record {
        self.record
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_db_basic() {
        let test_db = TestDb::new("test_testing_db_basic");
        assert_eq!(test_db.db().count(), 0);
        assert!(test_db.path().exists());
    }

    #[test]
    fn test_db_cleanup() {
        let path = {
            let test_db = TestDb::new("test_testing_db_cleanup");
            test_db.path().to_path_buf()
        };
        assert!(!path.exists());
    }

    #[test]
    fn test_record_builder() {
        let record = RecordBuilder::new(7)
            .values("genre", &["drama", "war"])
            .duration(90)
            .not_found()
            .build();
        assert_eq!(record.id, 7);
        assert_eq!(record.values("genre").len(), 2);
        assert!((record.length_seconds() - 90.0).abs() < f64::EPSILON);
        assert!(!record.flags.found);
        assert!(record.flags.readable);
    }
}
