//! Canonical media record
//!
//! One `Record` per cataloged file: technical attributes, state flags and the
//! property values attached to it. Derived attributes (length, bit rate, frame
//! rate) never fail; a zero divisor yields `0.0`.

pub mod field;

pub use field::{Field, FieldValue, FileSize};

use crate::schema::PropertyValue;
use bincode::{Decode, Encode};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Store-assigned record identifier
pub type RecordId = u64;

/// Boolean state of a record
///
/// Freshly imported records are found and readable unless stated otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
#[serde(default)]
pub struct RecordFlags {
    pub found: bool,
    pub readable: bool,
    pub has_thumbnail: bool,
    pub watched: bool,
    pub discarded: bool,
}

impl Default for RecordFlags {
    fn default() -> Self {
        Self {
            found: true,
            readable: true,
            has_thumbnail: false,
            watched: false,
            discarded: false,
        }
    }
}

/// Name of a single record flag, used by filter expressions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordFlag {
    Found,
    Readable,
    HasThumbnail,
    Watched,
    Discarded,
}

impl RecordFlag {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Found => "found",
            Self::Readable => "readable",
            Self::HasThumbnail => "with_thumbnails",
            Self::Watched => "watched",
            Self::Discarded => "discarded",
        }
    }
}

impl RecordFlags {
    #[must_use]
    pub const fn get(&self, flag: RecordFlag) -> bool {
        match flag {
            RecordFlag::Found => self.found,
            RecordFlag::Readable => self.readable,
            RecordFlag::HasThumbnail => self.has_thumbnail,
            RecordFlag::Watched => self.watched,
            RecordFlag::Discarded => self.discarded,
        }
    }
}

/// A cataloged media file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Encode, Decode)]
#[serde(default)]
pub struct Record {
    /// 0 until the store assigns an identifier
    pub id: RecordId,
    pub path: PathBuf,
    pub title: String,
    /// Bytes
    pub size: u64,
    /// In `duration_time_base` units
    pub duration: u64,
    pub duration_time_base: u64,
    /// Modification date, unix seconds
    pub date: i64,
    pub container_format: String,
    pub video_codec: String,
    pub audio_codec: String,
    pub width: u32,
    pub height: u32,
    pub frame_rate_num: u32,
    pub frame_rate_den: u32,
    pub sample_rate: u32,
    pub audio_bit_rate: u32,
    pub channels: u32,
    pub flags: RecordFlags,
    /// Property name to values, absent when unset
    pub properties: BTreeMap<String, Vec<PropertyValue>>,
}

impl Record {
    #[must_use]
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            ..Self::default()
        }
    }

    /// Duration in seconds
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn length_seconds(&self) -> f64 {
        if self.duration_time_base == 0 {
            0.0
        } else {
            self.duration as f64 / self.duration_time_base as f64
        }
    }

    /// Bits per second over the whole file
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn bit_rate(&self) -> f64 {
        let length = self.length_seconds();
        if length == 0.0 {
            0.0
        } else {
            (self.size as f64 * 8.0) / length
        }
    }

    #[must_use]
    pub fn frame_rate(&self) -> f64 {
        if self.frame_rate_den == 0 {
            0.0
        } else {
            f64::from(self.frame_rate_num) / f64::from(self.frame_rate_den)
        }
    }

    /// File name without extension
    #[must_use]
    pub fn file_title(&self) -> String {
        self.path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn filename(&self) -> String {
        self.path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Values of a property, empty when unset
    #[must_use]
    pub fn values(&self, property: &str) -> &[PropertyValue] {
        self.properties.get(property).map_or(&[], Vec::as_slice)
    }

    /// Replace the values of a property; an empty list unsets it
    pub fn set_values(&mut self, property: &str, values: Vec<PropertyValue>) {
        if values.is_empty() {
            self.properties.remove(property);
        } else {
            self.properties.insert(property.to_string(), values);
        }
    }

    /// Text indexed for term search
    ///
    /// Path, file title, title and every string property value.
    #[must_use]
    pub fn search_text(&self) -> String {
        let mut parts = vec![
            self.path.to_string_lossy().into_owned(),
            self.file_title(),
            self.title.clone(),
        ];
        parts.extend(
            self.properties
                .values()
                .flatten()
                .filter_map(PropertyValue::as_str)
                .map(String::from),
        );
        parts.join(" ")
    }

    #[must_use]
    pub const fn with_id(mut self, id: RecordId) -> Self {
        self.id = id;
        self
    }

    #[must_use]
    pub fn with_title(mut self, title: &str) -> Self {
        self.title = title.to_string();
        self
    }

    #[must_use]
    pub const fn with_size(mut self, size: u64) -> Self {
        self.size = size;
        self
    }

    #[must_use]
    pub const fn with_duration(mut self, duration: u64, time_base: u64) -> Self {
        self.duration = duration;
        self.duration_time_base = time_base;
        self
    }

    #[must_use]
    pub const fn with_date(mut self, date: i64) -> Self {
        self.date = date;
        self
    }

    #[must_use]
    pub const fn with_resolution(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    #[must_use]
    pub const fn with_flags(mut self, flags: RecordFlags) -> Self {
        self.flags = flags;
        self
    }

    #[must_use]
    pub const fn not_found(mut self) -> Self {
        self.flags.found = false;
        self
    }

    #[must_use]
    pub const fn unreadable(mut self) -> Self {
        self.flags.readable = false;
        self
    }

    #[must_use]
    pub fn with_values(mut self, property: &str, values: Vec<PropertyValue>) -> Self {
        self.set_values(property, values);
        self
    }
}
