//! Schema subsystem
//!
//! A schema is the ordered list of field descriptors of one target shape.
//!
//! # Design Principles
//!
//! - Declared once per target type, reflected once, shared read-only
//! - Declaration order is hydration order
//! - Unsupported declarations fail at reflection, never at hydration
//! - Schemas are immutable once built

mod declare;
mod errors;
mod loader;
mod reflector;
mod types;

pub use declare::{DataObject, DeclaredType, FieldDecl, SchemaBuilder};
pub use errors::{SchemaError, SchemaErrorCode, SchemaResult};
pub use loader::{
    DefaultDocument, FieldDocument, RuleDocument, SchemaDocument, SchemaLoader, TypeDocument,
};
pub use reflector::{reflect, SchemaReflector};
pub use types::{
    BackedEnum, EnumType, FieldDescriptor, ScalarKind, Schema, SchemaRef, TypeTag,
};
