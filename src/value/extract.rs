//! Typed extraction out of hydrated values

use chrono::{DateTime, FixedOffset};
use uuid::Uuid;

use crate::hydrator::HydratedObject;

use super::types::{Collection, EnumMember, Structured, Value};

/// Conversion from a hydrated `Value` into a Rust type.
///
/// Extraction never coerces: the value must already have the hydrated shape.
pub trait FromValue: Sized {
    /// Type name used in extraction errors
    const EXPECTED: &'static str;

    fn from_value(value: &Value) -> Option<Self>;
}

impl FromValue for Value {
    const EXPECTED: &'static str = "any";

    fn from_value(value: &Value) -> Option<Self> {
        Some(value.clone())
    }
}

impl FromValue for String {
    const EXPECTED: &'static str = "string";

    fn from_value(value: &Value) -> Option<Self> {
        value.as_str().map(str::to_string)
    }
}

impl FromValue for i64 {
    const EXPECTED: &'static str = "int";

    fn from_value(value: &Value) -> Option<Self> {
        value.as_i64()
    }
}

impl FromValue for f64 {
    const EXPECTED: &'static str = "float";

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Float(f) => Some(*f),
            Value::Int(i) => Some(*i as f64),
            _ => None,
        }
    }
}

impl FromValue for bool {
    const EXPECTED: &'static str = "bool";

    fn from_value(value: &Value) -> Option<Self> {
        value.as_bool()
    }
}

impl FromValue for Uuid {
    const EXPECTED: &'static str = "uuid";

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Uuid(id) => Some(*id),
            _ => None,
        }
    }
}

impl FromValue for DateTime<FixedOffset> {
    const EXPECTED: &'static str = "datetime";

    fn from_value(value: &Value) -> Option<Self> {
        value.as_temporal().copied()
    }
}

impl FromValue for EnumMember {
    const EXPECTED: &'static str = "enum";

    fn from_value(value: &Value) -> Option<Self> {
        value.as_enum().cloned()
    }
}

impl FromValue for Structured {
    const EXPECTED: &'static str = "json";

    fn from_value(value: &Value) -> Option<Self> {
        value.as_structured().cloned()
    }
}

impl FromValue for serde_json::Value {
    const EXPECTED: &'static str = "json";

    fn from_value(value: &Value) -> Option<Self> {
        Some(value.to_json())
    }
}

impl FromValue for Collection {
    const EXPECTED: &'static str = "collection";

    fn from_value(value: &Value) -> Option<Self> {
        value.as_collection().cloned()
    }
}

impl FromValue for HydratedObject {
    const EXPECTED: &'static str = "object";

    fn from_value(value: &Value) -> Option<Self> {
        value.as_object().cloned()
    }
}

impl<T: FromValue> FromValue for Vec<T> {
    const EXPECTED: &'static str = "list";

    fn from_value(value: &Value) -> Option<Self> {
        value.as_slice()?.iter().map(T::from_value).collect()
    }
}

impl<T: FromValue> FromValue for Option<T> {
    const EXPECTED: &'static str = "optional";

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Null => Some(None),
            other => T::from_value(other).map(Some),
        }
    }
}
