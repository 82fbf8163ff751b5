//! Record fields addressable by name
//!
//! Fields are what views sort on, group by and extract as columns. Each field
//! reduces a record to a [`FieldValue`], a totally ordered wrapper.

use super::Record;
use byte_unit::{Byte, UnitType};
use chrono::DateTime;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// A record attribute, stored or derived
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Id,
    Path,
    Filename,
    Title,
    Size,
    #[serde(alias = "duration")]
    Length,
    Date,
    Width,
    Height,
    Resolution,
    FrameRate,
    BitRate,
    SampleRate,
    AudioBitRate,
    Channels,
    ContainerFormat,
    VideoCodec,
    AudioCodec,
    Found,
    Readable,
    Watched,
    Discarded,
    WithThumbnails,
}

impl Field {
    pub const ALL: [Self; 23] = [
        Self::Id,
        Self::Path,
        Self::Filename,
        Self::Title,
        Self::Size,
        Self::Length,
        Self::Date,
        Self::Width,
        Self::Height,
        Self::Resolution,
        Self::FrameRate,
        Self::BitRate,
        Self::SampleRate,
        Self::AudioBitRate,
        Self::Channels,
        Self::ContainerFormat,
        Self::VideoCodec,
        Self::AudioCodec,
        Self::Found,
        Self::Readable,
        Self::Watched,
        Self::Discarded,
        Self::WithThumbnails,
    ];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Path => "path",
            Self::Filename => "filename",
            Self::Title => "title",
            Self::Size => "size",
            Self::Length => "length",
            Self::Date => "date",
            Self::Width => "width",
            Self::Height => "height",
            Self::Resolution => "resolution",
            Self::FrameRate => "frame_rate",
            Self::BitRate => "bit_rate",
            Self::SampleRate => "sample_rate",
            Self::AudioBitRate => "audio_bit_rate",
            Self::Channels => "channels",
            Self::ContainerFormat => "container_format",
            Self::VideoCodec => "video_codec",
            Self::AudioCodec => "audio_codec",
            Self::Found => "found",
            Self::Readable => "readable",
            Self::Watched => "watched",
            Self::Discarded => "discarded",
            Self::WithThumbnails => "with_thumbnails",
        }
    }

    /// Look a field up by name (`duration` is accepted for `length`)
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        let name = name.trim();
        if name == "duration" {
            return Some(Self::Length);
        }
        Self::ALL.into_iter().find(|f| f.name() == name)
    }

    /// Fields whose value spans more than one column
    #[must_use]
    pub const fn is_multi_column(self) -> bool {
        matches!(self, Self::Resolution)
    }

    /// Reduce a record to this field's comparable value
    #[must_use]
    pub fn value_of(self, record: &Record) -> FieldValue {
        match self {
            #[allow(clippy::cast_possible_wrap)]
            Self::Id => FieldValue::Int(record.id as i64),
            Self::Path => FieldValue::Text(record.path.to_string_lossy().into_owned()),
            Self::Filename => FieldValue::Text(record.filename()),
            Self::Title => FieldValue::Text(record.title.clone()),
            Self::Size => FieldValue::Size(FileSize(record.size)),
            Self::Length => FieldValue::Length(record.length_seconds()),
            Self::Date => FieldValue::Date(record.date),
            Self::Width => FieldValue::Int(i64::from(record.width)),
            Self::Height => FieldValue::Int(i64::from(record.height)),
            Self::Resolution => FieldValue::Resolution(record.width, record.height),
            Self::FrameRate => FieldValue::Float(record.frame_rate()),
            Self::BitRate => FieldValue::Float(record.bit_rate()),
            Self::SampleRate => FieldValue::Int(i64::from(record.sample_rate)),
            Self::AudioBitRate => FieldValue::Int(i64::from(record.audio_bit_rate)),
            Self::Channels => FieldValue::Int(i64::from(record.channels)),
            Self::ContainerFormat => FieldValue::Text(record.container_format.clone()),
            Self::VideoCodec => FieldValue::Text(record.video_codec.clone()),
            Self::AudioCodec => FieldValue::Text(record.audio_codec.clone()),
            Self::Found => FieldValue::Bool(record.flags.found),
            Self::Readable => FieldValue::Bool(record.flags.readable),
            Self::Watched => FieldValue::Bool(record.flags.watched),
            Self::Discarded => FieldValue::Bool(record.flags.discarded),
            Self::WithThumbnails => FieldValue::Bool(record.flags.has_thumbnail),
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Field {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("unknown field '{s}'"))
    }
}

/// File size in bytes, displayed with binary units
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileSize(pub u64);

impl fmt::Display for FileSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let size = Byte::from_u64(self.0).get_appropriate_unit(UnitType::Binary);
        write!(f, "{size:.2}")
    }
}

/// Comparable value of a record field
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Size(FileSize),
    /// Seconds
    Length(f64),
    /// Unix seconds
    Date(i64),
    Resolution(u32, u32),
}

impl FieldValue {
    const fn rank(&self) -> u8 {
        match self {
            Self::Bool(_) => 0,
            Self::Int(_) => 1,
            Self::Float(_) => 2,
            Self::Text(_) => 3,
            Self::Size(_) => 4,
            Self::Length(_) => 5,
            Self::Date(_) => 6,
            Self::Resolution(..) => 7,
        }
    }
}

impl Ord for FieldValue {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Bool(a), Self::Bool(b)) => a.cmp(b),
            (Self::Int(a), Self::Int(b)) | (Self::Date(a), Self::Date(b)) => a.cmp(b),
            (Self::Float(a), Self::Float(b)) | (Self::Length(a), Self::Length(b)) => a.total_cmp(b),
            (Self::Text(a), Self::Text(b)) => a.cmp(b),
            (Self::Size(a), Self::Size(b)) => a.cmp(b),
            (Self::Resolution(aw, ah), Self::Resolution(bw, bh)) => (aw, ah).cmp(&(bw, bh)),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl PartialOrd for FieldValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for FieldValue {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for FieldValue {}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x:.3}"),
            Self::Text(s) => f.write_str(s),
            Self::Size(size) => write!(f, "{size}"),
            Self::Length(seconds) => {
                #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                let total = seconds.max(0.0).round() as u64;
                write!(f, "{}:{:02}:{:02}", total / 3600, (total / 60) % 60, total % 60)
            }
            Self::Date(secs) => match DateTime::from_timestamp(*secs, 0) {
                Some(date) => write!(f, "{}", date.format("%Y-%m-%d %H:%M:%S")),
                None => write!(f, "{secs}"),
            },
            Self::Resolution(w, h) => write!(f, "{w}x{h}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Record;

    #[test]
    fn test_parse_names() {
        for field in Field::ALL {
            assert_eq!(Field::parse(field.name()), Some(field));
        }
        assert_eq!(Field::parse("duration"), Some(Field::Length));
        assert_eq!(Field::parse("nope"), None);
    }

    #[test]
    fn test_serde_alias() {
        let field: Field = serde_json::from_str("\"duration\"").unwrap();
        assert_eq!(field, Field::Length);
        assert_eq!(serde_json::to_string(&Field::FrameRate).unwrap(), "\"frame_rate\"");
    }

    #[test]
    fn test_resolution_orders_as_tuple() {
        let small = Record::new("a").with_resolution(640, 480);
        let wide = Record::new("b").with_resolution(1920, 800);
        let tall = Record::new("c").with_resolution(1920, 1080);
        let mut values: Vec<_> = [&tall, &small, &wide]
            .iter()
            .map(|r| Field::Resolution.value_of(r))
            .collect();
        values.sort();
        assert_eq!(
            values,
            vec![
                FieldValue::Resolution(640, 480),
                FieldValue::Resolution(1920, 800),
                FieldValue::Resolution(1920, 1080)
            ]
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(FieldValue::Length(3725.0).to_string(), "1:02:05");
        assert_eq!(FieldValue::Resolution(1920, 1080).to_string(), "1920x1080");
        assert_eq!(FieldValue::Date(0).to_string(), "1970-01-01 00:00:00");
        assert!(FileSize(2048).to_string().contains("KiB"));
    }

    #[test]
    fn test_multi_column() {
        assert!(Field::Resolution.is_multi_column());
        assert!(!Field::Size.is_multi_column());
    }
}
