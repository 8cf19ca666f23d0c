//! Hydration pipeline
//!
//! Per field, in schema order:
//! 1. Key present: custom cast or type coercion; an empty result is replaced
//!    by the default when the rule also applies to empty input
//! 2. Key absent: default resolution
//! 3. Still no value: nullable fields stay absent, others fail
//!
//! The first error aborts the hydration.

use std::sync::Arc;

use indexmap::IndexMap;
use tracing::{debug, trace, warn};

use crate::coerce::{CoercionResult, NestedHydrate, TypeCoercer};
use crate::config::{ConfigResult, HydratorConfig};
use crate::context::{ActorContext, Authorization, Settings, StaticSettings};
use crate::defaults::{DefaultResolver, DefaultRule};
use crate::observability::Event;
use crate::presence::PresenceSet;
use crate::schema::{DataObject, FieldDescriptor, Schema, SchemaError, SchemaReflector};
use crate::value::Value;

use super::errors::{HydrationError, HydrationResult};
use super::input::RawInput;
use super::object::{FromHydrated, HydratedObject, ObjectBuilder};

/// Builds hydrated objects from raw input.
///
/// A hydrator is immutable and can be shared across threads.
pub struct Hydrator {
    config: HydratorConfig,
    settings: Arc<dyn Settings>,
    reflector: Arc<SchemaReflector>,
}

impl Default for Hydrator {
    fn default() -> Self {
        Self::new(HydratorConfig::default())
    }
}

impl Hydrator {
    /// Creates a hydrator with empty settings and the shared schema cache.
    pub fn new(config: HydratorConfig) -> Self {
        Self {
            config,
            settings: Arc::new(StaticSettings::new()),
            reflector: SchemaReflector::shared(),
        }
    }

    /// Creates a hydrator configured from, and consulting, `settings`.
    pub fn from_settings(settings: Arc<dyn Settings>) -> ConfigResult<Self> {
        let config = HydratorConfig::from_settings(settings.as_ref())?;
        Ok(Self::new(config).with_settings(settings))
    }

    pub fn with_settings(mut self, settings: Arc<dyn Settings>) -> Self {
        self.settings = settings;
        self
    }

    /// Uses a private schema cache instead of the shared one
    pub fn with_reflector(mut self, reflector: Arc<SchemaReflector>) -> Self {
        self.reflector = reflector;
        self
    }

    pub fn config(&self) -> &HydratorConfig {
        &self.config
    }

    pub fn reflector(&self) -> &Arc<SchemaReflector> {
        &self.reflector
    }

    /// Schema of `T`, from the cache when reflected before
    pub fn reflect<T: DataObject>(&self) -> HydrationResult<Arc<Schema>> {
        Ok(self.reflector.reflect::<T>()?)
    }

    /// Hydrates raw input into the shape declared by `T`.
    pub fn hydrate<T: DataObject>(
        &self,
        raw: &RawInput,
        authorization: &dyn Authorization,
    ) -> HydrationResult<HydratedObject> {
        let schema = self.reflect::<T>()?;
        self.hydrate_schema(&schema, raw, authorization)
    }

    /// Hydrates and converts into `T` itself.
    pub fn hydrate_into<T: DataObject + FromHydrated>(
        &self,
        raw: &RawInput,
        authorization: &dyn Authorization,
    ) -> HydrationResult<T> {
        T::from_hydrated(&self.hydrate::<T>(raw, authorization)?)
    }

    /// Hydrates a JSON request body; the body must be an object.
    pub fn hydrate_json<T: DataObject>(
        &self,
        body: &serde_json::Value,
        authorization: &dyn Authorization,
    ) -> HydrationResult<HydratedObject> {
        self.hydrate::<T>(&RawInput::from_json(body)?, authorization)
    }

    /// Hydrates raw input against an explicit schema.
    pub fn hydrate_schema(
        &self,
        schema: &Arc<Schema>,
        raw: &RawInput,
        authorization: &dyn Authorization,
    ) -> HydrationResult<HydratedObject> {
        let pass = Pass {
            hydrator: self,
            authorization,
        };
        pass.run(schema, raw.as_map(), 0).inspect_err(|err| {
            warn!(
                event = %Event::HydrationFailed,
                schema = %schema.name(),
                code = err.code(),
                field = err.field_path().as_deref().unwrap_or(""),
                "hydration failed"
            );
        })
    }

    /// Coerces one value for `field` outside a hydration.
    ///
    /// Nested objects hydrate for an anonymous actor.
    pub fn coerce(&self, raw: &Value, field: &FieldDescriptor) -> CoercionResult<Value> {
        let anonymous = ActorContext::anonymous();
        let pass = Pass {
            hydrator: self,
            authorization: &anonymous,
        };
        TypeCoercer::new(&self.config)
            .with_nested(&pass, 0)
            .coerce(raw, field)
    }
}

/// One hydration call: the hydrator plus the caller's actor.
struct Pass<'h> {
    hydrator: &'h Hydrator,
    authorization: &'h dyn Authorization,
}

impl Pass<'_> {
    fn run(
        &self,
        schema: &Arc<Schema>,
        raw: &IndexMap<String, Value>,
        depth: usize,
    ) -> HydrationResult<HydratedObject> {
        debug!(
            event = %Event::HydrationStart,
            schema = %schema.name(),
            fields = schema.len(),
            keys = raw.len(),
            depth,
            "hydration started"
        );

        let presence = PresenceSet::track(raw, schema);
        let coercer = TypeCoercer::new(&self.hydrator.config).with_nested(self, depth);
        let resolver = DefaultResolver::new(self.authorization, self.hydrator.settings.as_ref());
        let mut builder = ObjectBuilder::new(Arc::clone(schema), presence);

        for (position, field) in schema.fields().iter().enumerate() {
            let value = match raw.get(field.key()) {
                Some(raw_value) => {
                    let coerced = self.coerce_present(&coercer, raw_value, field)?;
                    let replace_empty = coerced.is_empty()
                        && field.default_rule().is_some_and(DefaultRule::applies_to_empty);
                    if replace_empty {
                        self.default_for(&resolver, &coercer, &builder, field, position)?
                            .or(Some(coerced))
                    } else {
                        Some(coerced)
                    }
                }
                None => self.default_for(&resolver, &coercer, &builder, field, position)?,
            };

            match value {
                Some(Value::Null) | None if !field.nullable() => {
                    return Err(HydrationError::Schema {
                        field: field.name().to_string(),
                        source: SchemaError::missing_value(schema.name(), field.name()),
                    });
                }
                Some(value) => builder.set(field.name(), value),
                None => {
                    trace!(event = %Event::FieldAbsent, field = %field.name(), "field absent");
                }
            }
        }

        let object = builder.finish();
        debug!(
            event = %Event::HydrationComplete,
            schema = %schema.name(),
            filled = object.presence().len(),
            slots = object.len(),
            depth,
            "hydration complete"
        );
        Ok(object)
    }

    fn coerce_present(
        &self,
        coercer: &TypeCoercer<'_>,
        raw: &Value,
        field: &FieldDescriptor,
    ) -> HydrationResult<Value> {
        let coerced = match field.cast() {
            Some(cast) => cast.cast(raw, field),
            None => coercer.coerce(raw, field),
        }
        .map_err(|source| HydrationError::Coercion {
            field: field.name().to_string(),
            source,
        })?;

        trace!(
            event = %Event::FieldCoerced,
            field = %field.name(),
            from = raw.type_name(),
            to = %field.declared_type(),
            cast = field.has_custom_cast(),
            "field coerced"
        );
        Ok(coerced)
    }

    /// Resolves the default of `field` and coerces it into the declared type.
    fn default_for(
        &self,
        resolver: &DefaultResolver<'_>,
        coercer: &TypeCoercer<'_>,
        builder: &ObjectBuilder,
        field: &FieldDescriptor,
        position: usize,
    ) -> HydrationResult<Option<Value>> {
        let resolved = resolver
            .resolve(field, &builder.partial(position))
            .map_err(|source| HydrationError::Schema {
                field: field.name().to_string(),
                source,
            })?;

        let Some(value) = resolved else {
            return Ok(None);
        };

        let value = coercer
            .coerce(&value, field)
            .map_err(|source| HydrationError::Coercion {
                field: field.name().to_string(),
                source,
            })?;
        debug!(event = %Event::DefaultApplied, field = %field.name(), "default applied");
        Ok(Some(value))
    }
}

impl NestedHydrate for Pass<'_> {
    fn hydrate_nested(
        &self,
        schema: &Arc<Schema>,
        raw: &IndexMap<String, Value>,
        depth: usize,
    ) -> HydrationResult<HydratedObject> {
        self.run(schema, raw, depth)
    }
}
