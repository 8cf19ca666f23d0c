//! Runtime value domain
//!
//! One enum covers both sides of hydration:
//! - raw input (plain scalars, `List`, `Map`, possibly already-typed values)
//! - hydrated output (`Collection`, `Temporal`, `Enum`, `Structured`, `Object`)
//!
//! Keeping a single domain is what makes coercion idempotent: the output of
//! one pass is a valid input of the next.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, FixedOffset};
use indexmap::IndexMap;
use uuid::Uuid;

use crate::hydrator::HydratedObject;

/// A raw or hydrated value.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Value {
    /// Explicit null
    #[default]
    Null,
    /// Boolean
    Bool(bool),
    /// 64-bit signed integer
    Int(i64),
    /// 64-bit floating point
    Float(f64),
    /// UTF-8 string
    String(String),
    /// Parsed UUID
    Uuid(Uuid),
    /// Plain sequence, as it arrives from the outside
    List(Vec<Value>),
    /// Plain string-keyed map, as it arrives from the outside
    Map(IndexMap<String, Value>),
    /// The container wrapper produced for collection fields
    Collection(Collection),
    /// Parsed date-time
    Temporal(DateTime<FixedOffset>),
    /// Resolved enum member
    Enum(EnumMember),
    /// Generic property bag (not bound to a schema)
    Structured(Structured),
    /// Nested hydrated object
    Object(Box<HydratedObject>),
}

impl Value {
    /// Returns the type name for log fields and error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::Uuid(_) => "uuid",
            Value::List(_) => "list",
            Value::Map(_) => "map",
            Value::Collection(_) => "collection",
            Value::Temporal(_) => "datetime",
            Value::Enum(_) => "enum",
            Value::Structured(_) => "json",
            Value::Object(_) => "object",
        }
    }

    /// Whether this is a single scalar (not a container, not null).
    pub fn is_scalar(&self) -> bool {
        matches!(
            self,
            Value::Bool(_) | Value::Int(_) | Value::Float(_) | Value::String(_) | Value::Uuid(_)
        )
    }

    /// Whether the value counts as "empty" for defaults that also apply to
    /// empty input: null, the empty string, and empty containers.
    pub fn is_empty(&self) -> bool {
        match self {
            Value::Null => true,
            Value::String(s) => s.is_empty(),
            Value::List(items) => items.is_empty(),
            Value::Map(map) => map.is_empty(),
            Value::Collection(c) => c.is_empty(),
            _ => false,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Elements of a `List` or a `Collection`.
    pub fn as_slice(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            Value::Collection(c) => Some(c.as_slice()),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&IndexMap<String, Value>> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_collection(&self) -> Option<&Collection> {
        match self {
            Value::Collection(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_temporal(&self) -> Option<&DateTime<FixedOffset>> {
        match self {
            Value::Temporal(dt) => Some(dt),
            _ => None,
        }
    }

    pub fn as_enum(&self) -> Option<&EnumMember> {
        match self {
            Value::Enum(member) => Some(member),
            _ => None,
        }
    }

    pub fn as_structured(&self) -> Option<&Structured> {
        match self {
            Value::Structured(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&HydratedObject> {
        match self {
            Value::Object(obj) => Some(obj),
            _ => None,
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<Uuid> for Value {
    fn from(id: Uuid) -> Self {
        Value::Uuid(id)
    }
}

impl From<DateTime<FixedOffset>> for Value {
    fn from(dt: DateTime<FixedOffset>) -> Self {
        Value::Temporal(dt)
    }
}

impl From<Collection> for Value {
    fn from(c: Collection) -> Self {
        Value::Collection(c)
    }
}

impl From<EnumMember> for Value {
    fn from(member: EnumMember) -> Self {
        Value::Enum(member)
    }
}

impl From<HydratedObject> for Value {
    fn from(obj: HydratedObject) -> Self {
        Value::Object(Box::new(obj))
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::List(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map_or(Value::Null, Into::into)
    }
}

/// Ordered container produced for collection-typed fields.
///
/// A raw `List` becomes a `Collection` once a collection field has seen it;
/// a `Collection` is never re-mapped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Collection {
    items: Vec<Value>,
}

impl Collection {
    pub fn new(items: Vec<Value>) -> Self {
        Self { items }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn first(&self) -> Option<&Value> {
        self.items.first()
    }

    pub fn last(&self) -> Option<&Value> {
        self.items.last()
    }

    pub fn get(&self, index: usize) -> Option<&Value> {
        self.items.get(index)
    }

    pub fn contains(&self, value: &Value) -> bool {
        self.items.contains(value)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[Value] {
        &self.items
    }

    pub fn into_vec(self) -> Vec<Value> {
        self.items
    }
}

impl FromIterator<Value> for Collection {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Collection {
    type Item = &'a Value;
    type IntoIter = std::slice::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// Backing value of an enum case.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EnumBacking {
    String(String),
    Int(i64),
}

impl EnumBacking {
    /// Returns the backing value as a raw value
    pub fn to_value(&self) -> Value {
        match self {
            EnumBacking::String(s) => Value::String(s.clone()),
            EnumBacking::Int(i) => Value::Int(*i),
        }
    }
}

impl fmt::Display for EnumBacking {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EnumBacking::String(s) => write!(f, "{}", s),
            EnumBacking::Int(i) => write!(f, "{}", i),
        }
    }
}

impl From<&str> for EnumBacking {
    fn from(s: &str) -> Self {
        EnumBacking::String(s.to_string())
    }
}

impl From<String> for EnumBacking {
    fn from(s: String) -> Self {
        EnumBacking::String(s)
    }
}

impl From<i64> for EnumBacking {
    fn from(i: i64) -> Self {
        EnumBacking::Int(i)
    }
}

/// A resolved enum member.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EnumMember {
    enum_name: Arc<str>,
    case: String,
    backing: EnumBacking,
}

impl EnumMember {
    pub(crate) fn new(enum_name: Arc<str>, case: impl Into<String>, backing: EnumBacking) -> Self {
        Self {
            enum_name,
            case: case.into(),
            backing,
        }
    }

    /// Name of the enum this member belongs to
    pub fn enum_name(&self) -> &str {
        &self.enum_name
    }

    /// Case name (e.g. `Published`)
    pub fn case(&self) -> &str {
        &self.case
    }

    /// Backing value (e.g. `"published"`)
    pub fn backing(&self) -> &EnumBacking {
        &self.backing
    }
}

impl fmt::Display for EnumMember {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.enum_name, self.case)
    }
}

/// Generic structured value: an untyped property bag over nested map/array
/// data, as opposed to a schema-bound nested object.
#[derive(Debug, Clone, PartialEq)]
pub struct Structured(serde_json::Value);

impl Structured {
    pub fn new(inner: serde_json::Value) -> Self {
        Self(inner)
    }

    /// Looks up a top-level property; `None` unless the bag is an object.
    pub fn property(&self, name: &str) -> Option<&serde_json::Value> {
        self.0.as_object().and_then(|obj| obj.get(name))
    }

    pub fn has_property(&self, name: &str) -> bool {
        self.property(name).is_some()
    }

    /// Whether the bag is an object (as opposed to a sequence).
    pub fn is_object(&self) -> bool {
        self.0.is_object()
    }

    pub fn as_json(&self) -> &serde_json::Value {
        &self.0
    }

    pub fn into_json(self) -> serde_json::Value {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_values() {
        assert!(Value::Null.is_empty());
        assert!(Value::from("").is_empty());
        assert!(Value::List(vec![]).is_empty());
        assert!(Value::Collection(Collection::default()).is_empty());
        assert!(!Value::from("x").is_empty());
        assert!(!Value::Int(0).is_empty());
        assert!(!Value::Bool(false).is_empty());
    }

    #[test]
    fn test_default_is_null() {
        assert_eq!(Value::default(), Value::Null);
        assert!(Value::default().is_null());
    }

    #[test]
    fn test_vec_into_list() {
        let value = Value::from(vec!["a", "b"]);
        assert_eq!(value, Value::List(vec![Value::from("a"), Value::from("b")]));
    }

    #[test]
    fn test_collection_accessors() {
        let c: Collection = vec![Value::Int(1), Value::Int(2), Value::Int(3)]
            .into_iter()
            .collect();
        assert_eq!(c.len(), 3);
        assert_eq!(c.first(), Some(&Value::Int(1)));
        assert_eq!(c.last(), Some(&Value::Int(3)));
        assert!(c.contains(&Value::Int(2)));
        assert!(!c.contains(&Value::Int(4)));
    }

    #[test]
    fn test_structured_properties() {
        let bag = Structured::new(serde_json::json!({"type": "doc"}));
        assert!(bag.is_object());
        assert!(bag.has_property("type"));
        assert!(!bag.has_property("content"));

        let seq = Structured::new(serde_json::json!([1, 2]));
        assert!(!seq.is_object());
        assert!(seq.property("type").is_none());
    }

    #[test]
    fn test_enum_member_display() {
        let member = EnumMember::new(Arc::from("PostStatus"), "Published", "published".into());
        assert_eq!(member.to_string(), "PostStatus::Published");
        assert_eq!(member.backing().to_value(), Value::from("published"));
    }
}
