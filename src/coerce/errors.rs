//! # Coercion Errors

use thiserror::Error;

use crate::hydrator::HydrationError;
use crate::schema::SchemaError;

/// Result type for coercion
pub type CoercionResult<T> = Result<T, CoercionError>;

/// Coercion errors
///
/// Each one is fatal for the field and aborts the whole hydration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoercionError {
    #[error("Invalid date/time: '{0}'")]
    InvalidTemporalFormat(String),

    #[error("{value} is not a valid backing value for enum {enum_name}")]
    InvalidEnumValue { enum_name: String, value: String },

    #[error("Cast failed: {0}")]
    Cast(String),

    #[error("Nested objects exceed the maximum depth of {0}")]
    NestingTooDeep(usize),

    #[error("Nested schema unavailable: {0}")]
    Schema(#[from] SchemaError),

    #[error("Nested object '{schema}' failed: {source}")]
    Nested {
        schema: String,
        #[source]
        source: Box<HydrationError>,
    },
}

impl CoercionError {
    /// Shorthand for custom cast failures
    pub fn cast(message: impl Into<String>) -> Self {
        CoercionError::Cast(message.into())
    }

    /// Stable error code
    pub fn code(&self) -> &'static str {
        match self {
            CoercionError::InvalidTemporalFormat(_) => "HYDRATE_INVALID_TEMPORAL_FORMAT",
            CoercionError::InvalidEnumValue { .. } => "HYDRATE_INVALID_ENUM_VALUE",
            CoercionError::Cast(_) => "HYDRATE_CAST_FAILED",
            CoercionError::NestingTooDeep(_) => "HYDRATE_NESTING_TOO_DEEP",
            CoercionError::Schema(err) => err.code().code(),
            CoercionError::Nested { source, .. } => source.code(),
        }
    }
}
