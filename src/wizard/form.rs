//! Form field values and the per-sub-step form data store

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use super::StepKey;

/// Value captured from an input-bearing field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Flag(bool),
    Text(String),
}

impl FieldValue {
    pub fn text(value: impl Into<String>) -> Self {
        FieldValue::Text(value.into())
    }

    /// Whether the value satisfies a required-field check:
    /// non-empty trimmed text, or a set flag
    pub fn is_filled(&self) -> bool {
        match self {
            FieldValue::Flag(value) => *value,
            FieldValue::Text(value) => !value.trim().is_empty(),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(value) => Some(value),
            FieldValue::Flag(_) => None,
        }
    }

    pub fn as_flag(&self) -> Option<bool> {
        match self {
            FieldValue::Flag(value) => Some(*value),
            FieldValue::Text(_) => None,
        }
    }
}

impl Default for FieldValue {
    fn default() -> Self {
        FieldValue::Text(String::new())
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Flag(value) => write!(f, "{value}"),
            FieldValue::Text(value) => f.write_str(value),
        }
    }
}

/// Field name to value, for one sub-step
pub type FieldMap = BTreeMap<String, FieldValue>;

/// Accumulated form data for every visited sub-step
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormDataStore {
    entries: BTreeMap<StepKey, FieldMap>,
}

impl FormDataStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &StepKey) -> Option<&FieldMap> {
        self.entries.get(key)
    }

    /// Replace the entry for `key` with a fresh capture
    pub fn replace(&mut self, key: StepKey, fields: FieldMap) {
        self.entries.insert(key, fields);
    }

    /// Merge `fields` over the existing entry for `key`
    pub fn merge(&mut self, key: StepKey, fields: FieldMap) {
        self.entries.entry(key).or_default().extend(fields);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&StepKey, &FieldMap)> {
        self.entries.iter()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}
