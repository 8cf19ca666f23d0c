//! Hydrated objects
//!
//! A `HydratedObject` holds one slot per field of its schema. A slot holds
//! either the coerced input or a resolved default; fields that got neither
//! have no slot. There is no mutating API: objects are assembled by the
//! hydrator through `ObjectBuilder` and frozen on `finish`.

use std::sync::Arc;

use indexmap::IndexMap;
use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::presence::PresenceSet;
use crate::schema::{BackedEnum, Schema};
use crate::value::{EnumMember, FromValue, Value};

use super::errors::{HydrationError, HydrationResult};

/// Immutable result of a hydration
#[derive(Debug, Clone)]
pub struct HydratedObject {
    schema: Arc<Schema>,
    values: IndexMap<String, Value>,
    presence: PresenceSet,
}

impl HydratedObject {
    pub fn schema_name(&self) -> &str {
        self.schema.name()
    }

    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    /// Value of a field, `None` when the field has no slot
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.values.get(field)
    }

    /// Typed value of a field.
    ///
    /// Fields without a slot read as `Value::Null`, so `Option<T>` extracts
    /// them as `None`.
    pub fn get_as<V: FromValue>(&self, field: &str) -> HydrationResult<V> {
        let extraction = || HydrationError::Extraction {
            field: field.to_string(),
            expected: V::EXPECTED,
        };
        if self.schema.field(field).is_none() {
            return Err(extraction());
        }
        V::from_value(self.values.get(field).unwrap_or(&Value::Null)).ok_or_else(extraction)
    }

    /// Field resolved into a Rust enum
    pub fn get_enum<E: BackedEnum>(&self, field: &str) -> HydrationResult<E> {
        let member = self.get_as::<EnumMember>(field)?;
        E::from_member(&member).ok_or_else(|| HydrationError::Extraction {
            field: field.to_string(),
            expected: "enum",
        })
    }

    /// Whether the field has a slot
    pub fn has(&self, field: &str) -> bool {
        self.values.contains_key(field)
    }

    /// Whether the input explicitly supplied the field
    pub fn was_filled(&self, field: &str) -> bool {
        self.presence.was_filled(field)
    }

    /// Whether the field ended up without a value
    pub fn is_absent(&self, field: &str) -> bool {
        !self.has(field)
    }

    pub fn presence(&self) -> &PresenceSet {
        &self.presence
    }

    /// Slots in schema order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Number of filled slots
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Renders the object as a JSON object; fields without a slot are omitted.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::Value::Object(
            self.values
                .iter()
                .map(|(name, value)| (name.clone(), value.to_json()))
                .collect(),
        )
    }
}

impl PartialEq for HydratedObject {
    fn eq(&self, other: &Self) -> bool {
        self.schema.name() == other.schema.name()
            && self.values == other.values
            && self.presence == other.presence
    }
}

impl Serialize for HydratedObject {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.values.len()))?;
        for (name, value) in &self.values {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// A Rust type that builds itself from a hydrated object.
pub trait FromHydrated: Sized {
    fn from_hydrated(object: &HydratedObject) -> HydrationResult<Self>;
}

/// Read-only view of an object being hydrated, handed to computed defaults.
pub struct PartialObject<'a> {
    schema: &'a Schema,
    values: &'a IndexMap<String, Value>,
    presence: &'a PresenceSet,
    position: usize,
}

impl<'a> PartialObject<'a> {
    /// View over `values` while the field at `position` is being hydrated
    pub(crate) fn new(
        schema: &'a Schema,
        values: &'a IndexMap<String, Value>,
        presence: &'a PresenceSet,
        position: usize,
    ) -> Self {
        Self {
            schema,
            values,
            presence,
            position,
        }
    }

    pub fn schema_name(&self) -> &str {
        self.schema.name()
    }

    /// Value of an already hydrated field
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.values.get(field)
    }

    pub fn get_as<V: FromValue>(&self, field: &str) -> Option<V> {
        V::from_value(self.values.get(field)?)
    }

    pub fn was_filled(&self, field: &str) -> bool {
        self.presence.was_filled(field)
    }

    /// Whether `field` is declared before the field being hydrated
    pub fn is_resolved(&self, field: &str) -> bool {
        self.schema
            .position(field)
            .is_some_and(|index| index < self.position)
    }
}

/// Assembles a `HydratedObject` field by field.
pub(crate) struct ObjectBuilder {
    schema: Arc<Schema>,
    values: IndexMap<String, Value>,
    presence: PresenceSet,
}

impl ObjectBuilder {
    pub(crate) fn new(schema: Arc<Schema>, presence: PresenceSet) -> Self {
        Self {
            values: IndexMap::with_capacity(schema.len()),
            schema,
            presence,
        }
    }

    pub(crate) fn partial(&self, position: usize) -> PartialObject<'_> {
        PartialObject::new(&self.schema, &self.values, &self.presence, position)
    }

    pub(crate) fn set(&mut self, field: &str, value: Value) {
        self.values.insert(field.to_string(), value);
    }

    pub(crate) fn finish(self) -> HydratedObject {
        HydratedObject {
            schema: self.schema,
            values: self.values,
            presence: self.presence,
        }
    }
}
