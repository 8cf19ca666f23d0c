//! Type coercion
//!
//! Rules, first match wins:
//! 1. Raw value already satisfies the declared type: returned unchanged
//! 2. List declared, raw is a string: split on the delimiter
//! 3. List of plain elements declared, raw is a list: unchanged
//! 4. List of concrete elements or collection declared, raw is a list:
//!    wrapped in a `Collection`, elements coerced when concrete
//! 5. Date/time declared, raw is a string: parsed
//! 6. Structured declared: JSON text, maps and lists promoted
//! 7. Enum declared, raw is a scalar: resolved by backing value
//! 8. Anything else: unchanged
//!
//! Scalars parse from strings when the text is clean, and nested objects
//! hydrate through the `NestedHydrate` seam.

use std::borrow::Cow;
use std::sync::Arc;

use indexmap::IndexMap;
use uuid::Uuid;

use crate::config::HydratorConfig;
use crate::hydrator::{HydratedObject, HydrationResult};
use crate::schema::{EnumType, FieldDescriptor, ScalarKind, Schema, SchemaRef, TypeTag};
use crate::value::{Collection, Value};

use super::errors::{CoercionError, CoercionResult};
use super::structured;
use super::temporal::parse_temporal;

/// Hydrates nested objects on behalf of the coercer.
pub trait NestedHydrate {
    fn hydrate_nested(
        &self,
        schema: &Arc<Schema>,
        raw: &IndexMap<String, Value>,
        depth: usize,
    ) -> HydrationResult<HydratedObject>;
}

/// Converts raw values into declared types.
///
/// Without a nested hydrator, nested-object fields fall back to pass-through.
pub struct TypeCoercer<'a> {
    config: &'a HydratorConfig,
    nested: Option<&'a dyn NestedHydrate>,
    depth: usize,
}

impl<'a> TypeCoercer<'a> {
    pub fn new(config: &'a HydratorConfig) -> Self {
        Self {
            config,
            nested: None,
            depth: 0,
        }
    }

    /// Enables nested-object hydration at the given depth
    pub fn with_nested(mut self, nested: &'a dyn NestedHydrate, depth: usize) -> Self {
        self.nested = Some(nested);
        self.depth = depth;
        self
    }

    /// Coerces a raw value into the field's declared type.
    pub fn coerce(&self, raw: &Value, field: &FieldDescriptor) -> CoercionResult<Value> {
        self.coerce_as(raw, field.declared_type(), field.element_type())
    }

    /// Coerces a raw value into `tag`; `element` is the element type of
    /// collection fields.
    pub fn coerce_as(
        &self,
        raw: &Value,
        tag: &TypeTag,
        element: Option<&TypeTag>,
    ) -> CoercionResult<Value> {
        if satisfies(raw, tag) {
            return Ok(raw.clone());
        }

        match tag {
            TypeTag::Scalar(kind) => Ok(coerce_scalar(raw, *kind)),
            TypeTag::Enum(enum_type) => coerce_enum(raw, enum_type),
            TypeTag::Temporal => match raw {
                Value::String(s) => parse_temporal(s)
                    .map(Value::Temporal)
                    .ok_or_else(|| CoercionError::InvalidTemporalFormat(s.clone())),
                _ => Ok(raw.clone()),
            },
            TypeTag::GenericStructured => Ok(structured::promote(raw)),
            TypeTag::ListOf(inner) => self.coerce_list(raw, inner),
            TypeTag::Collection => self.coerce_collection(raw, element),
            TypeTag::NestedObjectOf(schema) => self.coerce_nested(raw, schema),
            TypeTag::Unknown => Ok(raw.clone()),
        }
    }

    fn coerce_list(&self, raw: &Value, inner: &TypeTag) -> CoercionResult<Value> {
        match raw {
            Value::String(s) if inner.splits_from_string() => {
                let parts = split(s, &self.config.list_delimiter);
                if inner.is_concrete_element() {
                    self.map_elements(&parts, inner)
                } else {
                    Ok(Value::List(parts))
                }
            }
            Value::List(items) if inner.is_concrete_element() => self.map_elements(items, inner),
            _ => Ok(raw.clone()),
        }
    }

    fn coerce_collection(&self, raw: &Value, element: Option<&TypeTag>) -> CoercionResult<Value> {
        match (raw, element) {
            (Value::List(items), Some(inner)) if inner.is_concrete_element() => {
                self.map_elements(items, inner)
            }
            (Value::List(items), _) => Ok(Value::Collection(Collection::new(items.clone()))),
            _ => Ok(raw.clone()),
        }
    }

    fn map_elements(&self, items: &[Value], inner: &TypeTag) -> CoercionResult<Value> {
        items
            .iter()
            .map(|item| self.coerce_as(item, inner, None))
            .collect::<CoercionResult<Collection>>()
            .map(Value::Collection)
    }

    fn coerce_nested(&self, raw: &Value, schema_ref: &SchemaRef) -> CoercionResult<Value> {
        let Some(nested) = self.nested else {
            return Ok(raw.clone());
        };

        let Some(map) = object_map(raw) else {
            return Ok(raw.clone());
        };

        let depth = self.depth + 1;
        if depth > self.config.max_depth {
            return Err(CoercionError::NestingTooDeep(self.config.max_depth));
        }

        let schema = schema_ref.resolve()?;
        nested
            .hydrate_nested(&schema, &map, depth)
            .map(|obj| Value::Object(Box::new(obj)))
            .map_err(|source| CoercionError::Nested {
                schema: schema.name().to_string(),
                source: Box::new(source),
            })
    }
}

/// Whether `raw` already has the declared type.
///
/// Any `Collection` satisfies a list or collection field, whatever its
/// elements hold.
fn satisfies(raw: &Value, tag: &TypeTag) -> bool {
    match (tag, raw) {
        (TypeTag::Scalar(kind), _) => kind.matches(raw),
        (TypeTag::Enum(enum_type), Value::Enum(member)) => enum_type.owns(member),
        (TypeTag::Temporal, Value::Temporal(_)) => true,
        (TypeTag::GenericStructured, Value::Structured(_)) => true,
        (TypeTag::ListOf(_) | TypeTag::Collection, Value::Collection(_)) => true,
        (TypeTag::NestedObjectOf(schema_ref), Value::Object(obj)) => schema_ref
            .resolve()
            .map(|schema| schema.name() == obj.schema_name())
            .unwrap_or(false),
        (TypeTag::Unknown, _) => true,
        _ => false,
    }
}

/// Field map of raw input that can hydrate a nested object: a plain map, a
/// JSON object string, or a structured object.
fn object_map(raw: &Value) -> Option<Cow<'_, IndexMap<String, Value>>> {
    let json = match raw {
        Value::Map(map) => return Some(Cow::Borrowed(map)),
        Value::String(text) => serde_json::from_str::<serde_json::Value>(text).ok()?,
        Value::Structured(bag) => bag.as_json().clone(),
        _ => return None,
    };
    match Value::from(json) {
        Value::Map(map) => Some(Cow::Owned(map)),
        _ => None,
    }
}

fn split(text: &str, delimiter: &str) -> Vec<Value> {
    if text.trim().is_empty() {
        return Vec::new();
    }
    text.split(delimiter)
        .map(|part| Value::from(part.trim()))
        .collect()
}

fn coerce_scalar(raw: &Value, kind: ScalarKind) -> Value {
    let parsed = match (kind, raw) {
        (ScalarKind::Int, Value::String(s)) => s.trim().parse::<i64>().ok().map(Value::Int),
        (ScalarKind::Float, Value::String(s)) => s
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|f| f.is_finite())
            .map(Value::Float),
        (ScalarKind::Float, Value::Int(i)) => Some(Value::Float(*i as f64)),
        (ScalarKind::Bool, Value::String(s)) => parse_bool(s).map(Value::Bool),
        (ScalarKind::Bool, Value::Int(0)) => Some(Value::Bool(false)),
        (ScalarKind::Bool, Value::Int(1)) => Some(Value::Bool(true)),
        (ScalarKind::Uuid, Value::String(s)) => Uuid::parse_str(s.trim()).ok().map(Value::Uuid),
        _ => None,
    };
    parsed.unwrap_or_else(|| raw.clone())
}

fn parse_bool(text: &str) -> Option<bool> {
    match text.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn coerce_enum(raw: &Value, enum_type: &EnumType) -> CoercionResult<Value> {
    if !raw.is_scalar() {
        return Ok(raw.clone());
    }
    enum_type
        .resolve(raw)
        .map(Value::Enum)
        .ok_or_else(|| CoercionError::InvalidEnumValue {
            enum_name: enum_type.name().to_string(),
            value: match raw {
                Value::String(s) => s.clone(),
                other => other.to_json().to_string(),
            },
        })
}
