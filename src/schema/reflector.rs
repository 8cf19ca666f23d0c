//! Schema reflection with a process-lifetime cache
//!
//! A schema is a pure function of its target type, so each type is reflected
//! once and shared read-only afterwards. Population is insert-if-absent: two
//! threads racing on the same type may both build the schema, exactly one
//! build is kept.

use std::any::TypeId;
use std::sync::{Arc, OnceLock};

use dashmap::DashMap;
use tracing::debug;

use crate::observability::Event;

use super::declare::DataObject;
use super::errors::SchemaResult;
use super::types::Schema;

static SHARED: OnceLock<Arc<SchemaReflector>> = OnceLock::new();

/// Reflects data objects into schemas and caches the result per type.
#[derive(Debug, Default)]
pub struct SchemaReflector {
    schemas: DashMap<TypeId, Arc<Schema>>,
}

impl SchemaReflector {
    pub fn new() -> Self {
        Self::default()
    }

    /// The reflector shared by the whole process
    pub fn shared() -> Arc<SchemaReflector> {
        Arc::clone(SHARED.get_or_init(|| Arc::new(SchemaReflector::new())))
    }

    /// Returns the schema of `T`, building it on first use.
    ///
    /// Failed reflections are not cached; the declaration is re-checked on
    /// every call until it succeeds.
    pub fn reflect<T: DataObject>(&self) -> SchemaResult<Arc<Schema>> {
        let type_id = TypeId::of::<T>();

        if let Some(cached) = self.schemas.get(&type_id) {
            debug!(event = %Event::SchemaCacheHit, schema = %cached.name(), "schema cache hit");
            return Ok(Arc::clone(cached.value()));
        }

        let built = Arc::new(T::declare().build()?);
        let entry = self.schemas.entry(type_id).or_insert(built);
        debug!(
            event = %Event::SchemaReflected,
            schema = %entry.name(),
            fields = entry.len(),
            "schema reflected"
        );
        Ok(Arc::clone(entry.value()))
    }

    /// Whether `T` has been reflected already
    pub fn contains<T: DataObject>(&self) -> bool {
        self.schemas.contains_key(&TypeId::of::<T>())
    }

    /// Number of cached schemas
    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}

/// Reflects `T` through the shared reflector.
pub fn reflect<T: DataObject>() -> SchemaResult<Arc<Schema>> {
    SHARED
        .get_or_init(|| Arc::new(SchemaReflector::new()))
        .reflect::<T>()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{DeclaredType, FieldDecl, SchemaBuilder, SchemaErrorCode};

    struct Tag;

    impl DataObject for Tag {
        fn declare() -> SchemaBuilder {
            SchemaBuilder::new("Tag")
                .field(FieldDecl::new("name", DeclaredType::String))
                .field(FieldDecl::new("slug", DeclaredType::String))
        }
    }

    struct Broken;

    impl DataObject for Broken {
        fn declare() -> SchemaBuilder {
            SchemaBuilder::new("Broken").field(FieldDecl::new(
                "pair",
                DeclaredType::Tuple(vec![DeclaredType::Int, DeclaredType::Int]),
            ))
        }
    }

    #[test]
    fn test_reflect_caches_per_type() {
        let reflector = SchemaReflector::new();
        assert!(!reflector.contains::<Tag>());

        let first = reflector.reflect::<Tag>().unwrap();
        let second = reflector.reflect::<Tag>().unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(reflector.len(), 1);
        assert_eq!(first.name(), "Tag");
    }

    #[test]
    fn test_failed_reflection_not_cached() {
        let reflector = SchemaReflector::new();
        let err = reflector.reflect::<Broken>().unwrap_err();
        assert_eq!(err.code(), SchemaErrorCode::UnsupportedType);
        assert!(reflector.is_empty());
    }

    #[test]
    fn test_shared_reflector_is_single_instance() {
        let a = SchemaReflector::shared();
        let b = SchemaReflector::shared();
        assert!(Arc::ptr_eq(&a, &b));

        let schema = reflect::<Tag>().unwrap();
        assert!(Arc::ptr_eq(&schema, &a.reflect::<Tag>().unwrap()));
    }

    #[test]
    fn test_concurrent_reflection_converges() {
        let reflector = Arc::new(SchemaReflector::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let reflector = Arc::clone(&reflector);
                std::thread::spawn(move || reflector.reflect::<Tag>().unwrap())
            })
            .collect();

        let schemas: Vec<Arc<Schema>> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert_eq!(reflector.len(), 1);
        let cached = reflector.reflect::<Tag>().unwrap();
        assert!(schemas.iter().all(|s| Arc::ptr_eq(s, &cached)));
    }
}
