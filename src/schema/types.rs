use bincode::{Decode, Encode};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use super::error::{Result, SchemaError};

/// Value kind of a property
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Encode, Decode)]
#[serde(rename_all = "lowercase")]
pub enum PropertyKind {
    Bool,
    Int,
    Float,
    Str,
}

impl PropertyKind {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Float => "float",
            Self::Str => "str",
        }
    }

    /// Default value for properties declared without enumeration or default
    #[must_use]
    pub fn zero_value(self) -> PropertyValue {
        match self {
            Self::Bool => PropertyValue::Bool(false),
            Self::Int => PropertyValue::Int(0),
            Self::Float => PropertyValue::Float(0.0),
            Self::Str => PropertyValue::Str(String::new()),
        }
    }

    /// Parse user text into a value of this kind
    ///
    /// Returns `None` if the text cannot represent a value of this kind.
    #[must_use]
    pub fn parse_value(self, text: &str) -> Option<PropertyValue> {
        let text = text.trim();
        match self {
            Self::Bool => match text.to_lowercase().as_str() {
                "true" | "yes" | "1" => Some(PropertyValue::Bool(true)),
                "false" | "no" | "0" => Some(PropertyValue::Bool(false)),
                _ => None,
            },
            Self::Int => text.parse().ok().map(PropertyValue::Int),
            Self::Float => text.parse().ok().map(PropertyValue::Float),
            Self::Str => Some(PropertyValue::Str(text.to_string())),
        }
    }
}

impl fmt::Display for PropertyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PropertyKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "bool" | "boolean" => Ok(Self::Bool),
            "int" | "integer" => Ok(Self::Int),
            "float" => Ok(Self::Float),
            "str" | "string" => Ok(Self::Str),
            other => Err(format!("unknown property kind '{other}'")),
        }
    }
}

/// A single property value
///
/// Floats compare with `total_cmp`, so values are totally ordered and can be
/// used as grouping keys.
#[derive(Debug, Clone, Serialize, Deserialize, Encode, Decode)]
#[serde(untagged)]
pub enum PropertyValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl PropertyValue {
    #[must_use]
    pub const fn kind(&self) -> PropertyKind {
        match self {
            Self::Bool(_) => PropertyKind::Bool,
            Self::Int(_) => PropertyKind::Int,
            Self::Float(_) => PropertyKind::Float,
            Self::Str(_) => PropertyKind::Str,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    const fn rank(&self) -> u8 {
        match self {
            Self::Bool(_) => 0,
            Self::Int(_) => 1,
            Self::Float(_) => 2,
            Self::Str(_) => 3,
        }
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<i64> for PropertyValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for PropertyValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for PropertyValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl Ord for PropertyValue {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Bool(a), Self::Bool(b)) => a.cmp(b),
            (Self::Int(a), Self::Int(b)) => a.cmp(b),
            (Self::Float(a), Self::Float(b)) => a.total_cmp(b),
            (Self::Str(a), Self::Str(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl PartialOrd for PropertyValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for PropertyValue {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for PropertyValue {}

impl Hash for PropertyValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.rank().hash(state);
        match self {
            Self::Bool(b) => b.hash(state),
            Self::Int(i) => i.hash(state),
            Self::Float(x) => x.to_bits().hash(state),
            Self::Str(s) => s.hash(state),
        }
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Str(s) => f.write_str(s),
        }
    }
}

/// Definition of a property (tag) attachable to records
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct PropertyType {
    pub name: String,
    pub kind: PropertyKind,
    pub multiple: bool,
    /// Legal values, default first
    pub enumeration: Option<Vec<PropertyValue>>,
    pub default: PropertyValue,
}

impl PropertyType {
    /// Build a checked property definition
    ///
    /// With an enumeration, an explicit default must be one of its members and is
    /// moved to the front; without one, the default falls back to the kind's zero
    /// value.
    ///
    /// # Errors
    /// Returns `SchemaError::InvalidDefinition` if the name is blank, an
    /// enumeration member or the default is not of `kind`, or the enumeration
    /// holds fewer than two distinct values.
    pub fn new(
        name: &str,
        kind: PropertyKind,
        multiple: bool,
        enumeration: Option<Vec<PropertyValue>>,
        default: Option<PropertyValue>,
    ) -> Result<Self> {
        let name = name.trim();
        if name.is_empty() {
            return Err(SchemaError::InvalidDefinition(
                name.to_string(),
                "name cannot be empty".into(),
            ));
        }

        let invalid = |reason: String| SchemaError::InvalidDefinition(name.to_string(), reason);

        let mut definition = Self {
            name: name.to_string(),
            kind,
            multiple,
            enumeration: None,
            default: kind.zero_value(),
        };

        let default = default
            .map(|value| definition.coerce(value))
            .transpose()
            .map_err(|e| invalid(format!("default value rejected ({e})")))?;

        match enumeration {
            Some(values) => {
                let mut members: Vec<PropertyValue> = Vec::with_capacity(values.len());
                for value in values {
                    let value = definition
                        .coerce(value)
                        .map_err(|e| invalid(format!("enumeration rejected ({e})")))?;
                    if !members.contains(&value) {
                        members.push(value);
                    }
                }
                if members.len() < 2 {
                    return Err(invalid(
                        "enumeration needs at least 2 distinct values".into(),
                    ));
                }
                if let Some(default) = default {
                    let position = members.iter().position(|v| *v == default).ok_or_else(|| {
                        invalid(format!("default '{default}' is not in the enumeration"))
                    })?;
                    let value = members.remove(position);
                    members.insert(0, value);
                }
                definition.default = members[0].clone();
                definition.enumeration = Some(members);
            }
            None => {
                if let Some(default) = default {
                    definition.default = default;
                }
            }
        }

        Ok(definition)
    }

    /// Validate and coerce a batch of raw values for this property
    ///
    /// Int values are widened for float properties and duplicates are dropped
    /// (first occurrence wins).
    ///
    /// # Errors
    /// Returns `SchemaError::InvalidTagValue` on kind mismatch, a value outside the
    /// enumeration, or several values for a single-valued property.
    pub fn validate(&self, raw: Vec<PropertyValue>) -> Result<Vec<PropertyValue>> {
        let mut values: Vec<PropertyValue> = Vec::with_capacity(raw.len());
        for value in raw {
            let value = self.coerce(value)?;
            if let Some(enumeration) = &self.enumeration
                && !enumeration.contains(&value)
            {
                return Err(self.rejected(&value, "not in enumeration"));
            }
            if !values.contains(&value) {
                values.push(value);
            }
        }
        if !self.multiple && values.len() > 1 {
            return Err(SchemaError::InvalidTagValue {
                tag: self.name.clone(),
                value: values
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(", "),
                reason: "property accepts a single value".into(),
            });
        }
        Ok(values)
    }

    /// Parse textual values through the same validation boundary
    ///
    /// # Errors
    /// Returns `SchemaError::InvalidTagValue` if a text is not a value of this kind
    /// or the parsed values fail [`Self::validate`].
    pub fn parse<S: AsRef<str>>(&self, texts: &[S]) -> Result<Vec<PropertyValue>> {
        let raw = texts
            .iter()
            .map(|text| {
                self.kind.parse_value(text.as_ref()).ok_or_else(|| {
                    SchemaError::InvalidTagValue {
                        tag: self.name.clone(),
                        value: text.as_ref().to_string(),
                        reason: format!("expected {}", self.kind),
                    }
                })
            })
            .collect::<Result<Vec<_>>>()?;
        self.validate(raw)
    }

    /// Shape consumed by external collaborators
    #[must_use]
    pub fn describe(&self) -> PropertyDescription {
        PropertyDescription {
            name: self.name.clone(),
            kind: self.kind,
            enumeration: self.enumeration.clone(),
            default_value: self.default.clone(),
            multiple: self.multiple,
        }
    }

    fn coerce(&self, value: PropertyValue) -> Result<PropertyValue> {
        match (self.kind, value) {
            (PropertyKind::Bool, v @ PropertyValue::Bool(_))
            | (PropertyKind::Int, v @ PropertyValue::Int(_))
            | (PropertyKind::Float, v @ PropertyValue::Float(_))
            | (PropertyKind::Str, v @ PropertyValue::Str(_)) => Ok(v),
            #[allow(clippy::cast_precision_loss)]
            (PropertyKind::Float, PropertyValue::Int(i)) => Ok(PropertyValue::Float(i as f64)),
            (kind, other) => Err(self.rejected(&other, &format!("expected {kind}, got {}", other.kind()))),
        }
    }

    fn rejected(&self, value: &PropertyValue, reason: &str) -> SchemaError {
        SchemaError::InvalidTagValue {
            tag: self.name.clone(),
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// External description of a property
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyDescription {
    pub name: String,
    pub kind: PropertyKind,
    pub enumeration: Option<Vec<PropertyValue>>,
    pub default_value: PropertyValue,
    pub multiple: bool,
}

/// Store-side consequence of a catalog mutation
///
/// The catalog never touches records; the store applies these intents to every
/// record's property map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogChange {
    Defined(String),
    Renamed { old: String, new: String },
    Removed(String),
    MultiplicityChanged { name: String, multiple: bool },
}
