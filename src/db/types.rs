//! Key and value wrappers for the store trees
//!
//! - **`RecordKey`**: record identifier as big-endian bytes, so sled iterates
//!   records in identifier order
//! - **`TagKey`**: bincode-encoded `(property, value)` pair; every key of one
//!   property shares the encoded property name as a prefix
//! - **`IdList`**: sorted identifier list stored under an index key
//!
//! All bincode use goes through `bincode::config::standard()`.

use super::error::{DbError, Result};
use crate::record::RecordId;
use crate::schema::PropertyValue;

/// Record identifier as a sled key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordKey(pub RecordId);

impl RecordKey {
    #[must_use]
    pub const fn to_bytes(self) -> [u8; 8] {
        self.0.to_be_bytes()
    }

    /// # Errors
    ///
    /// Returns `DbError::InvalidInput` if the key is not exactly 8 bytes long.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let raw: [u8; 8] = bytes
            .try_into()
            .map_err(|_| DbError::InvalidInput(format!("record key of {} bytes", bytes.len())))?;
        Ok(Self(RecordId::from_be_bytes(raw)))
    }
}

/// Reverse index key for one property value
#[derive(Debug, Clone, Copy)]
pub struct TagKey<'a> {
    pub property: &'a str,
    pub value: &'a PropertyValue,
}

impl<'a> TagKey<'a> {
    #[must_use]
    pub const fn new(property: &'a str, value: &'a PropertyValue) -> Self {
        Self { property, value }
    }

    /// # Errors
    ///
    /// Returns `DbError::EncodeError` if encoding fails.
    pub fn to_bytes(self) -> Result<Vec<u8>> {
        Ok(bincode::encode_to_vec(
            (self.property, self.value),
            bincode::config::standard(),
        )?)
    }

    /// Prefix shared by every key of `property`
    ///
    /// # Errors
    ///
    /// Returns `DbError::EncodeError` if encoding fails.
    pub fn prefix(property: &str) -> Result<Vec<u8>> {
        Ok(bincode::encode_to_vec(property, bincode::config::standard())?)
    }

    /// # Errors
    ///
    /// Returns `DbError::DecodeError` if the bytes are not a tag key.
    pub fn decode(bytes: &[u8]) -> Result<(String, PropertyValue)> {
        let (pair, _): ((String, PropertyValue), usize) =
            bincode::decode_from_slice(bytes, bincode::config::standard())?;
        Ok(pair)
    }
}

/// Sorted, duplicate-free identifier list
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdList(pub Vec<RecordId>);

impl IdList {
    /// # Errors
    ///
    /// Returns `DbError::DecodeError` if the bytes are not an identifier list.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let (ids, _): (Vec<RecordId>, usize) =
            bincode::decode_from_slice(bytes, bincode::config::standard())?;
        Ok(Self(ids))
    }

    /// # Errors
    ///
    /// Returns `DbError::EncodeError` if encoding fails.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(bincode::encode_to_vec(&self.0, bincode::config::standard())?)
    }

    /// Returns false if the id was already present
    pub fn insert(&mut self, id: RecordId) -> bool {
        match self.0.binary_search(&id) {
            Ok(_) => false,
            Err(pos) => {
                self.0.insert(pos, id);
                true
            }
        }
    }

    /// Returns false if the id was absent
    pub fn remove(&mut self, id: RecordId) -> bool {
        match self.0.binary_search(&id) {
            Ok(pos) => {
                self.0.remove(pos);
                true
            }
            Err(_) => false,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
#[path = "types_tests.rs"]
mod types_tests;
