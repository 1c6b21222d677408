//! The unit of export: one key and its JSON value.

use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;

/// A key/value pair read from the store.
///
/// The value is kept as the JSON text found in the store. It is validated on
/// construction but never re-encoded, so a chunk file carries the same bytes
/// the store held, including key order inside objects.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Record {
    /// Store key
    pub key: String,
    /// Stored JSON document
    pub value: Box<RawValue>,
}

impl Record {
    /// Builds a record from raw stored bytes, failing if they are not a
    /// single valid JSON document.
    pub fn from_json_bytes(key: String, value: &[u8]) -> Result<Self, serde_json::Error> {
        let value: Box<RawValue> = serde_json::from_slice(value)?;
        Ok(Self { key, value })
    }

    /// Builds a record from an already-parsed value.
    pub fn from_value(
        key: impl Into<String>,
        value: &serde_json::Value,
    ) -> Result<Self, serde_json::Error> {
        Ok(Self {
            key: key.into(),
            value: serde_json::value::to_raw_value(value)?,
        })
    }

    /// The stored JSON text.
    pub fn value_json(&self) -> &str {
        self.value.get()
    }
}

impl PartialEq for Record {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key && self.value.get() == other.value.get()
    }
}

impl Eq for Record {}
