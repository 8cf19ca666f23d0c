//! Schema error types
//!
//! Error codes:
//! - HYDRATE_UNSUPPORTED_TYPE (declared type has no type tag)
//! - HYDRATE_DUPLICATE_FIELD (field declared twice)
//! - HYDRATE_UNKNOWN_DEPENDENCY (computed default names a missing field)
//! - HYDRATE_MISSING_VALUE (non-nullable field ended up without a value)
//! - HYDRATE_DEFAULT_CYCLE (computed default reads a field not yet hydrated)
//! - HYDRATE_UNKNOWN_SCHEMA (schema name not registered)
//! - HYDRATE_SCHEMA_IMMUTABLE (schema name registered twice)
//! - HYDRATE_MALFORMED_SCHEMA (schema document unreadable or invalid)
//!
//! All schema errors are fatal for the hydration that raised them. They are
//! configuration errors: retrying with the same input fails the same way.

use std::fmt;

/// Schema-specific error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaErrorCode {
    /// Declared type cannot be mapped into a type tag
    UnsupportedType,
    /// Field name declared more than once
    DuplicateField,
    /// Computed default depends on an undeclared field
    UnknownDependency,
    /// Non-nullable field without input and without a default
    MissingValue,
    /// Computed default depends on a field hydrated after it
    DefaultCycle,
    /// Schema name not found
    UnknownSchema,
    /// Attempt to re-register an existing schema
    SchemaImmutable,
    /// Schema document could not be read or parsed
    MalformedSchema,
}

impl SchemaErrorCode {
    /// Returns the stable string code
    pub fn code(&self) -> &'static str {
        match self {
            SchemaErrorCode::UnsupportedType => "HYDRATE_UNSUPPORTED_TYPE",
            SchemaErrorCode::DuplicateField => "HYDRATE_DUPLICATE_FIELD",
            SchemaErrorCode::UnknownDependency => "HYDRATE_UNKNOWN_DEPENDENCY",
            SchemaErrorCode::MissingValue => "HYDRATE_MISSING_VALUE",
            SchemaErrorCode::DefaultCycle => "HYDRATE_DEFAULT_CYCLE",
            SchemaErrorCode::UnknownSchema => "HYDRATE_UNKNOWN_SCHEMA",
            SchemaErrorCode::SchemaImmutable => "HYDRATE_SCHEMA_IMMUTABLE",
            SchemaErrorCode::MalformedSchema => "HYDRATE_MALFORMED_SCHEMA",
        }
    }

    /// Whether the error is raised while hydrating (as opposed to while
    /// reflecting or loading a schema)
    pub fn is_hydration_time(&self) -> bool {
        matches!(
            self,
            SchemaErrorCode::MissingValue | SchemaErrorCode::DefaultCycle
        )
    }
}

impl fmt::Display for SchemaErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Schema error with full context
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaError {
    /// Error code
    code: SchemaErrorCode,
    /// Human-readable message
    message: String,
    /// Schema name if applicable
    schema: Option<String>,
    /// Field name if applicable
    field: Option<String>,
}

impl SchemaError {
    fn new(
        code: SchemaErrorCode,
        message: String,
        schema: Option<String>,
        field: Option<String>,
    ) -> Self {
        Self {
            code,
            message,
            schema,
            field,
        }
    }

    /// Create an unsupported type error
    pub fn unsupported_type(
        schema: impl Into<String>,
        field: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        let schema = schema.into();
        let field = field.into();
        Self::new(
            SchemaErrorCode::UnsupportedType,
            format!(
                "Field '{}' of '{}' has an unsupported type: {}",
                field,
                schema,
                reason.into()
            ),
            Some(schema),
            Some(field),
        )
    }

    /// Create a duplicate field error
    pub fn duplicate_field(schema: impl Into<String>, field: impl Into<String>) -> Self {
        let schema = schema.into();
        let field = field.into();
        Self::new(
            SchemaErrorCode::DuplicateField,
            format!("Field '{}' is declared more than once in '{}'", field, schema),
            Some(schema),
            Some(field),
        )
    }

    /// Create an unknown dependency error
    pub fn unknown_dependency(
        schema: impl Into<String>,
        field: impl Into<String>,
        dependency: impl Into<String>,
    ) -> Self {
        let schema = schema.into();
        let field = field.into();
        Self::new(
            SchemaErrorCode::UnknownDependency,
            format!(
                "Default of '{}' in '{}' depends on undeclared field '{}'",
                field,
                schema,
                dependency.into()
            ),
            Some(schema),
            Some(field),
        )
    }

    /// Create a missing value error
    pub fn missing_value(schema: impl Into<String>, field: impl Into<String>) -> Self {
        let schema = schema.into();
        let field = field.into();
        Self::new(
            SchemaErrorCode::MissingValue,
            format!(
                "Field '{}' of '{}' is not nullable, was not supplied and has no default",
                field, schema
            ),
            Some(schema),
            Some(field),
        )
    }

    /// Create a default cycle error
    pub fn default_cycle(
        schema: impl Into<String>,
        field: impl Into<String>,
        dependency: impl Into<String>,
    ) -> Self {
        let schema = schema.into();
        let field = field.into();
        Self::new(
            SchemaErrorCode::DefaultCycle,
            format!(
                "Default of '{}' in '{}' reads '{}' before it is hydrated",
                field,
                schema,
                dependency.into()
            ),
            Some(schema),
            Some(field),
        )
    }

    /// Create an unknown schema error
    pub fn unknown_schema(schema: impl Into<String>) -> Self {
        let schema = schema.into();
        Self::new(
            SchemaErrorCode::UnknownSchema,
            format!("Schema '{}' not found", schema),
            Some(schema),
            None,
        )
    }

    /// Create a schema immutable error
    pub fn schema_immutable(schema: impl Into<String>) -> Self {
        let schema = schema.into();
        Self::new(
            SchemaErrorCode::SchemaImmutable,
            format!("Schema '{}' is already registered", schema),
            Some(schema),
            None,
        )
    }

    /// Create an error for a malformed schema document
    pub fn malformed_schema(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::new(
            SchemaErrorCode::MalformedSchema,
            format!("Malformed schema '{}': {}", path.into(), reason.into()),
            None,
            None,
        )
    }

    /// Returns the error code
    pub fn code(&self) -> SchemaErrorCode {
        self.code
    }

    /// Returns the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the schema name if applicable
    pub fn schema(&self) -> Option<&str> {
        self.schema.as_deref()
    }

    /// Returns the field name if applicable
    pub fn field(&self) -> Option<&str> {
        self.field.as_deref()
    }
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code.code(), self.message)
    }
}

impl std::error::Error for SchemaError {}

/// Result type for schema operations
pub type SchemaResult<T> = Result<T, SchemaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(SchemaErrorCode::UnsupportedType.code(), "HYDRATE_UNSUPPORTED_TYPE");
        assert_eq!(SchemaErrorCode::DuplicateField.code(), "HYDRATE_DUPLICATE_FIELD");
        assert_eq!(SchemaErrorCode::MissingValue.code(), "HYDRATE_MISSING_VALUE");
        assert_eq!(SchemaErrorCode::DefaultCycle.code(), "HYDRATE_DEFAULT_CYCLE");
        assert_eq!(SchemaErrorCode::SchemaImmutable.code(), "HYDRATE_SCHEMA_IMMUTABLE");
    }

    #[test]
    fn test_hydration_time_codes() {
        assert!(SchemaErrorCode::MissingValue.is_hydration_time());
        assert!(SchemaErrorCode::DefaultCycle.is_hydration_time());
        assert!(!SchemaErrorCode::UnsupportedType.is_hydration_time());
        assert!(!SchemaErrorCode::MalformedSchema.is_hydration_time());
    }

    #[test]
    fn test_error_carries_context() {
        let err = SchemaError::missing_value("CreatePostData", "title");
        assert_eq!(err.schema(), Some("CreatePostData"));
        assert_eq!(err.field(), Some("title"));

        let display = err.to_string();
        assert!(display.starts_with("[HYDRATE_MISSING_VALUE]"));
        assert!(display.contains("title"));
    }

    #[test]
    fn test_malformed_schema_has_no_field() {
        let err = SchemaError::malformed_schema("post.json", "Invalid JSON");
        assert_eq!(err.code(), SchemaErrorCode::MalformedSchema);
        assert!(err.field().is_none());
        assert!(err.message().contains("post.json"));
    }
}
