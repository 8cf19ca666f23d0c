//! # Hydration Errors

use thiserror::Error;

use crate::coerce::CoercionError;
use crate::schema::SchemaError;

/// Result type for hydration
pub type HydrationResult<T> = Result<T, HydrationError>;

/// Hydration errors
///
/// Hydration stops at the first error; no partial object is returned.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum HydrationError {
    #[error("Schema could not be reflected: {0}")]
    Reflection(#[from] SchemaError),

    #[error("Field '{field}': {source}")]
    Schema {
        field: String,
        #[source]
        source: SchemaError,
    },

    #[error("Field '{field}': {source}")]
    Coercion {
        field: String,
        #[source]
        source: CoercionError,
    },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Field '{field}' does not hold a {expected}")]
    Extraction {
        field: String,
        expected: &'static str,
    },
}

impl HydrationError {
    /// Stable error code
    pub fn code(&self) -> &'static str {
        match self {
            HydrationError::Reflection(source) | HydrationError::Schema { source, .. } => {
                source.code().code()
            }
            HydrationError::Coercion { source, .. } => source.code(),
            HydrationError::InvalidInput(_) => "HYDRATE_INVALID_INPUT",
            HydrationError::Extraction { .. } => "HYDRATE_EXTRACTION_FAILED",
        }
    }

    /// Field the error is attached to
    pub fn field(&self) -> Option<&str> {
        match self {
            HydrationError::Reflection(source) => source.field(),
            HydrationError::Schema { field, .. }
            | HydrationError::Coercion { field, .. }
            | HydrationError::Extraction { field, .. } => Some(field),
            HydrationError::InvalidInput(_) => None,
        }
    }

    /// Dotted path to the innermost failing field of nested objects
    pub fn field_path(&self) -> Option<String> {
        match self {
            HydrationError::Coercion {
                field,
                source: CoercionError::Nested { source, .. },
            } => Some(match source.field_path() {
                Some(inner) => format!("{}.{}", field, inner),
                None => field.clone(),
            }),
            other => other.field().map(str::to_string),
        }
    }
}
