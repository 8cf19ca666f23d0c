//! Promotion of raw input into generic structured values

use crate::value::{Structured, Value};

/// Promotes JSON text, plain maps and plain lists into a `Structured` bag.
///
/// Strings that do not decode to a JSON object or array pass through
/// unchanged, as does every other value.
pub fn promote(raw: &Value) -> Value {
    match raw {
        Value::String(text) => match serde_json::from_str::<serde_json::Value>(text) {
            Ok(json) if json.is_object() || json.is_array() => {
                Value::Structured(Structured::new(json))
            }
            _ => raw.clone(),
        },
        Value::Map(_) | Value::List(_) | Value::Collection(_) | Value::Object(_) => {
            Value::Structured(Structured::new(raw.to_json()))
        }
        _ => raw.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_json_text_decodes() {
        let promoted = promote(&Value::from(r#"{"name": "Sebastian", "age": 30}"#));
        let bag = promoted.as_structured().unwrap();
        assert_eq!(bag.property("name"), Some(&json!("Sebastian")));
        assert!(bag.has_property("age"));
    }

    #[test]
    fn test_map_converts_without_text() {
        let raw = Value::from(json!({"nested": {"a": [1, 2]}}));
        let promoted = promote(&raw);
        assert_eq!(
            promoted.as_structured().unwrap().as_json(),
            &json!({"nested": {"a": [1, 2]}})
        );
    }

    #[test]
    fn test_plain_text_passes_through() {
        let raw = Value::from("hello world");
        assert_eq!(promote(&raw), raw);
        // valid JSON, but a scalar
        let raw = Value::from("42");
        assert_eq!(promote(&raw), raw);
    }
}
