//! # Settings source
//!
//! String-keyed configuration consulted by setting-gated defaults and by
//! `HydratorConfig::from_settings`.

use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::config::{ConfigError, ConfigResult};

/// Environment variable prefix read by `StaticSettings::from_env`
pub const ENV_PREFIX: &str = "HYDRATE_";

/// A read-only settings source.
pub trait Settings: Send + Sync {
    fn get(&self, key: &str) -> Option<serde_json::Value>;

    /// Boolean flag; absent keys are `false`.
    ///
    /// Strings `"true"`, `"1"`, `"yes"`, `"on"` and non-zero numbers count as set.
    fn flag(&self, key: &str) -> bool {
        match self.get(key) {
            Some(serde_json::Value::Bool(b)) => b,
            Some(serde_json::Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
            Some(serde_json::Value::String(s)) => {
                matches!(s.trim().to_ascii_lowercase().as_str(), "true" | "1" | "yes" | "on")
            }
            _ => false,
        }
    }

    fn string(&self, key: &str) -> Option<String> {
        match self.get(key)? {
            serde_json::Value::String(s) => Some(s),
            serde_json::Value::Null => None,
            other => Some(other.to_string()),
        }
    }
}

/// In-memory settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StaticSettings {
    values: IndexMap<String, serde_json::Value>,
}

impl StaticSettings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.set(key, value);
        self
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) {
        self.values.insert(key.into(), value.into());
    }

    /// Reads a JSON object of settings.
    pub fn from_json_str(content: &str) -> ConfigResult<Self> {
        serde_json::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Reads a JSON object of settings from a file.
    pub fn from_json_file(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_json_str(&content)
    }

    /// Reads `HYDRATE_*` variables from the process environment.
    pub fn from_env() -> Self {
        Self::from_vars(std::env::vars())
    }

    /// Reads `HYDRATE_*` pairs: the prefix is stripped and the rest
    /// lowercased (`HYDRATE_LIST_DELIMITER` becomes `list_delimiter`). Values
    /// are parsed as JSON when possible and kept as strings otherwise.
    pub fn from_vars<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut settings = Self::new();
        for (key, value) in vars {
            let Some(name) = key.as_ref().strip_prefix(ENV_PREFIX) else {
                continue;
            };
            if name.is_empty() {
                continue;
            }
            let raw = value.into();
            let value = serde_json::from_str(&raw).unwrap_or(serde_json::Value::String(raw));
            settings.set(name.to_ascii_lowercase(), value);
        }
        settings
    }

    /// Overlays `other` on top of these settings
    pub fn merge(mut self, other: StaticSettings) -> Self {
        self.values.extend(other.values);
        self
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl Settings for StaticSettings {
    fn get(&self, key: &str) -> Option<serde_json::Value> {
        self.values.get(key).cloned()
    }
}
