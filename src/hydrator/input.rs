//! Raw input
//!
//! Untyped key/value input as it arrives from a request body. Read-only to
//! the hydrator.

use indexmap::IndexMap;

use crate::value::Value;

use super::errors::{HydrationError, HydrationResult};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawInput {
    values: IndexMap<String, Value>,
}

impl RawInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds input from a JSON body, which must be an object.
    pub fn from_json(body: &serde_json::Value) -> HydrationResult<Self> {
        match Value::from(body.clone()) {
            Value::Map(values) => Ok(Self { values }),
            other => Err(HydrationError::InvalidInput(format!(
                "expected a JSON object, got {}",
                other.type_name()
            ))),
        }
    }

    /// Parses a JSON body.
    pub fn from_json_str(body: &str) -> HydrationResult<Self> {
        let json: serde_json::Value = serde_json::from_str(body)
            .map_err(|e| HydrationError::InvalidInput(format!("invalid JSON: {}", e)))?;
        Self::from_json(&json)
    }

    /// Builder-style insert
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn as_map(&self) -> &IndexMap<String, Value> {
        &self.values
    }
}

impl From<IndexMap<String, Value>> for RawInput {
    fn from(values: IndexMap<String, Value>) -> Self {
        Self { values }
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for RawInput {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }
}
