//! Structured persistence record.
//!
//! A [`Record`] is a named-field compound document: integer, string,
//! nested-compound and list-of-compound fields keyed by name. It is backed by
//! a JSON object so the whole tree can be written to disk with `serde_json`.
//!
//! Reads are lenient in the same way the save format always has been: a
//! missing or mistyped integer reads as `0`, a missing string as `""`, and a
//! missing list as empty. Callers that need to tell "absent" from "zero" must
//! check [`Record::contains`] first.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Errors raised when a serialized record cannot be decoded.
#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    /// The input was not valid JSON.
    #[error("record is not valid JSON: {source}")]
    Json {
        /// The underlying parse error.
        #[from]
        source: serde_json::Error,
    },
}

/// A named-field compound value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    fields: Map<String, Value>,
}

impl Record {
    /// Create an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a field with this name exists.
    pub fn contains(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the record has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Store an integer field.
    pub fn put_int(&mut self, key: &str, value: i32) {
        self.fields.insert(key.to_owned(), Value::from(value));
    }

    /// Read an integer field, `0` when missing or not an `i32`.
    pub fn get_int(&self, key: &str) -> i32 {
        self.fields
            .get(key)
            .and_then(Value::as_i64)
            .and_then(|v| i32::try_from(v).ok())
            .unwrap_or(0)
    }

    /// Store a string field.
    pub fn put_string(&mut self, key: &str, value: &str) {
        self.fields.insert(key.to_owned(), Value::from(value));
    }

    /// Read a string field, `""` when missing or not a string.
    pub fn get_string(&self, key: &str) -> &str {
        self.fields.get(key).and_then(Value::as_str).unwrap_or("")
    }

    /// Store a nested compound.
    pub fn put_compound(&mut self, key: &str, value: Self) {
        self.fields.insert(key.to_owned(), Value::Object(value.fields));
    }

    /// Read a nested compound, `None` when missing or not a compound.
    pub fn get_compound(&self, key: &str) -> Option<Self> {
        match self.fields.get(key) {
            Some(Value::Object(fields)) => Some(Self {
                fields: fields.clone(),
            }),
            _ => None,
        }
    }

    /// Store a list of compounds.
    pub fn put_list(&mut self, key: &str, values: Vec<Self>) {
        let list = values.into_iter().map(|r| Value::Object(r.fields)).collect();
        self.fields.insert(key.to_owned(), Value::Array(list));
    }

    /// Read a list of compounds. Non-compound entries are skipped; a missing
    /// field reads as an empty list.
    pub fn get_list(&self, key: &str) -> Vec<Self> {
        match self.fields.get(key) {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(|item| match item {
                    Value::Object(fields) => Some(Self {
                        fields: fields.clone(),
                    }),
                    _ => None,
                })
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Encode as pretty-printed JSON.
    pub fn to_json(&self) -> String {
        // A map of JSON values always serializes.
        serde_json::to_string_pretty(&self.fields).unwrap_or_default()
    }

    /// Decode from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::Json`] if the text is not a JSON object.
    pub fn from_json(text: &str) -> Result<Self, RecordError> {
        Ok(serde_json::from_str(text)?)
    }
}
