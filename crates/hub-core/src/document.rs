//! # Documents and Identifiers
//!
//! Schemaless document model for the InventoHub store. A document is a
//! plain JSON object; collections impose no schema beyond the `_id`
//! primary key, which every stored document carries as a UUID string.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::error::{HubError, HubResult};

/// A schemaless document: a JSON object keyed by field name.
pub type Document = serde_json::Map<String, Value>;

/// Primary-key field name present on every stored document.
pub const ID_FIELD: &str = "_id";

/// Document identifier. Stored and transmitted as a UUID string.
///
/// Identifiers arriving from the outside (path segments, id lists in
/// request bodies) are parsed with [`DocId::parse`], which rejects
/// malformed input before it reaches the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocId(Uuid);

impl DocId {
    /// Generates a fresh random identifier
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parses an identifier from its string form
    pub fn parse(value: &str) -> HubResult<Self> {
        Uuid::parse_str(value).map(Self).map_err(|_| HubError::InvalidId {
            value: value.to_string(),
        })
    }
}

impl Default for DocId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for DocId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for DocId {
    type Err = HubError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<DocId> for Value {
    fn from(id: DocId) -> Self {
        Value::String(id.to_string())
    }
}

/// Reads a string field from a document
pub fn doc_str<'a>(doc: &'a Document, field: &str) -> Option<&'a str> {
    doc.get(field).and_then(Value::as_str)
}

/// Reads a numeric field as an integer, truncating floats.
/// JSON clients are loose about number forms; `3` and `3.0` both count.
pub fn doc_i64(doc: &Document, field: &str) -> Option<i64> {
    let value = doc.get(field)?;
    value.as_i64().or_else(|| value.as_f64().map(|f| f as i64))
}

/// Reads the `_id` field of a stored document
pub fn doc_id(doc: &Document) -> Option<DocId> {
    doc_str(doc, ID_FIELD).and_then(|raw| DocId::parse(raw).ok())
}
