//! Hydrator configuration
//!
//! - `list_delimiter`: separator for splitting strings into lists (`,`)
//! - `max_depth`: deepest nested object level hydrated (32)

use thiserror::Error;

use crate::context::Settings;

/// Result type for configuration
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Configuration errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("Failed to read settings file {path}: {message}")]
    Io { path: String, message: String },

    #[error("Invalid settings: {0}")]
    Parse(String),

    #[error("Invalid value for {key}: {reason}")]
    InvalidValue { key: String, reason: String },
}

/// Settings key for the list delimiter
pub const LIST_DELIMITER_KEY: &str = "list_delimiter";
/// Settings key for the nested depth limit
pub const MAX_DEPTH_KEY: &str = "max_depth";

/// Configuration for a `Hydrator`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HydratorConfig {
    /// Delimiter for splitting strings into list fields.
    pub list_delimiter: String,
    /// Maximum nesting of nested objects.
    pub max_depth: usize,
}

impl Default for HydratorConfig {
    fn default() -> Self {
        Self {
            list_delimiter: ",".to_string(),
            max_depth: 32,
        }
    }
}

impl HydratorConfig {
    /// Reads overrides from a settings source; absent keys keep defaults.
    pub fn from_settings(settings: &dyn Settings) -> ConfigResult<Self> {
        let mut config = Self::default();

        if let Some(delimiter) = settings.string(LIST_DELIMITER_KEY) {
            config.list_delimiter = delimiter;
        }

        if let Some(raw) = settings.get(MAX_DEPTH_KEY) {
            config.max_depth = match &raw {
                serde_json::Value::Number(n) => n.as_u64(),
                serde_json::Value::String(s) => s.trim().parse().ok(),
                _ => None,
            }
            .and_then(|depth| usize::try_from(depth).ok())
            .ok_or_else(|| ConfigError::InvalidValue {
                key: MAX_DEPTH_KEY.to_string(),
                reason: format!("expected a positive integer, got {}", raw),
            })?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Builder-style delimiter override
    pub fn with_delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.list_delimiter = delimiter.into();
        self
    }

    /// Builder-style depth override
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.list_delimiter.is_empty() {
            return Err(ConfigError::InvalidValue {
                key: LIST_DELIMITER_KEY.to_string(),
                reason: "delimiter must not be empty".to_string(),
            });
        }
        if self.max_depth == 0 {
            return Err(ConfigError::InvalidValue {
                key: MAX_DEPTH_KEY.to_string(),
                reason: "depth must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::StaticSettings;

    #[test]
    fn test_defaults() {
        let config = HydratorConfig::default();
        assert_eq!(config.list_delimiter, ",");
        assert_eq!(config.max_depth, 32);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_settings() {
        let settings = StaticSettings::new()
            .with("list_delimiter", ";")
            .with("max_depth", 4);
        let config = HydratorConfig::from_settings(&settings).unwrap();
        assert_eq!(config.list_delimiter, ";");
        assert_eq!(config.max_depth, 4);
    }

    #[test]
    fn test_depth_from_string() {
        let settings = StaticSettings::new().with("max_depth", "6");
        assert_eq!(HydratorConfig::from_settings(&settings).unwrap().max_depth, 6);
    }

    #[test]
    fn test_invalid_values() {
        let empty = StaticSettings::new().with("list_delimiter", "");
        assert!(matches!(
            HydratorConfig::from_settings(&empty),
            Err(ConfigError::InvalidValue { key, .. }) if key == "list_delimiter"
        ));

        let zero = StaticSettings::new().with("max_depth", 0);
        assert!(HydratorConfig::from_settings(&zero).is_err());

        let negative = StaticSettings::new().with("max_depth", -2);
        assert!(HydratorConfig::from_settings(&negative).is_err());
    }
}
