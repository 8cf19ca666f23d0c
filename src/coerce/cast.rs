//! Per-field custom casts

use crate::schema::FieldDescriptor;
use crate::value::Value;

use super::errors::CoercionResult;

/// Replaces the type coercer for a single field.
///
/// A cast receives the raw value of a present field and returns the value to
/// store. Defaults and presence tracking still apply around it.
pub trait CustomCast: Send + Sync {
    fn cast(&self, raw: &Value, field: &FieldDescriptor) -> CoercionResult<Value>;
}

impl<F> CustomCast for F
where
    F: Fn(&Value, &FieldDescriptor) -> CoercionResult<Value> + Send + Sync,
{
    fn cast(&self, raw: &Value, field: &FieldDescriptor) -> CoercionResult<Value> {
        self(raw, field)
    }
}

/// Trims and lowercases string input; other values pass through.
#[derive(Debug, Clone, Copy, Default)]
pub struct Lowercase;

impl CustomCast for Lowercase {
    fn cast(&self, raw: &Value, _field: &FieldDescriptor) -> CoercionResult<Value> {
        Ok(match raw {
            Value::String(s) => Value::String(s.trim().to_lowercase()),
            other => other.clone(),
        })
    }
}
