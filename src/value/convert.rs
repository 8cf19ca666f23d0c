//! Conversions between `Value` and JSON
//!
//! - JSON objects become plain `Map`s and arrays plain `List`s; nothing is
//!   typed until a field declaration says so.
//! - Rendering back to JSON is lossless for plain data; typed values render as
//!   their canonical wire form (RFC 3339 timestamps, enum backing values).

use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};
use serde_json::Number;

use super::types::{Collection, Value};

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => number_to_value(&n),
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::List(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(obj) => Value::Map(
                obj.into_iter()
                    .map(|(key, value)| (key, Value::from(value)))
                    .collect(),
            ),
        }
    }
}

fn number_to_value(n: &Number) -> Value {
    if let Some(i) = n.as_i64() {
        Value::Int(i)
    } else if let Some(f) = n.as_f64() {
        Value::Float(f)
    } else {
        // u64 beyond i64::MAX; keep the digits rather than lose precision
        Value::String(n.to_string())
    }
}

impl Value {
    /// Renders the value as JSON.
    ///
    /// Non-finite floats have no JSON form and render as `null`.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Int(i) => serde_json::Value::from(*i),
            Value::Float(f) => Number::from_f64(*f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::String(s) => serde_json::Value::String(s.clone()),
            Value::Uuid(id) => serde_json::Value::String(id.to_string()),
            Value::List(items) => {
                serde_json::Value::Array(items.iter().map(Value::to_json).collect())
            }
            Value::Map(map) => serde_json::Value::Object(
                map.iter()
                    .map(|(key, value)| (key.clone(), value.to_json()))
                    .collect(),
            ),
            Value::Collection(c) => {
                serde_json::Value::Array(c.iter().map(Value::to_json).collect())
            }
            Value::Temporal(dt) => serde_json::Value::String(dt.to_rfc3339()),
            Value::Enum(member) => member.backing().to_value().to_json(),
            Value::Structured(bag) => bag.as_json().clone(),
            Value::Object(obj) => obj.to_json(),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Int(i) => serializer.serialize_i64(*i),
            Value::Float(f) => serializer.serialize_f64(*f),
            Value::String(s) => serializer.serialize_str(s),
            Value::Uuid(id) => id.serialize(serializer),
            Value::List(items) => serialize_items(items, serializer),
            Value::Map(map) => {
                let mut out = serializer.serialize_map(Some(map.len()))?;
                for (key, value) in map {
                    out.serialize_entry(key, value)?;
                }
                out.end()
            }
            Value::Collection(c) => c.serialize(serializer),
            Value::Temporal(dt) => dt.serialize(serializer),
            Value::Enum(member) => member.backing().to_value().serialize(serializer),
            Value::Structured(bag) => bag.as_json().serialize(serializer),
            Value::Object(obj) => obj.serialize(serializer),
        }
    }
}

impl Serialize for Collection {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serialize_items(self.as_slice(), serializer)
    }
}

fn serialize_items<S: Serializer>(items: &[Value], serializer: S) -> Result<S::Ok, S::Error> {
    let mut seq = serializer.serialize_seq(Some(items.len()))?;
    for item in items {
        seq.serialize_element(item)?;
    }
    seq.end()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_json_objects_become_plain_maps() {
        let value = Value::from(json!({"name": "Taylor", "tags": ["a", "b"], "age": 41}));
        let map = value.as_map().unwrap();
        assert_eq!(map.get("name"), Some(&Value::from("Taylor")));
        assert_eq!(map.get("age"), Some(&Value::Int(41)));
        assert!(matches!(map.get("tags"), Some(Value::List(items)) if items.len() == 2));
    }

    #[test]
    fn test_float_and_int_numbers() {
        assert_eq!(Value::from(json!(1.5)), Value::Float(1.5));
        assert_eq!(Value::from(json!(-3)), Value::Int(-3));
    }

    #[test]
    fn test_to_json_renders_collections_as_arrays() {
        let value = Value::Collection(Collection::new(vec![Value::from("x")]));
        assert_eq!(value.to_json(), json!(["x"]));
    }

    #[test]
    fn test_serialize_matches_to_json() {
        let value = Value::from(json!({"nested": {"list": [1, null, true]}}));
        let serialized = serde_json::to_value(&value).unwrap();
        assert_eq!(serialized, value.to_json());
    }

    #[test]
    fn test_non_finite_float_renders_null() {
        assert_eq!(Value::Float(f64::NAN).to_json(), serde_json::Value::Null);
    }
}
