//! hydrate - type-directed hydration of untyped input
//!
//! Raw key/value input (a decoded request body) goes in, an immutable typed
//! object comes out:
//! - scalar parsing, delimited-string splitting, list and collection mapping
//! - date/time parsing, enum resolution, structured-value promotion
//! - nested objects hydrated recursively
//! - presence tracking and rule-based defaults for missing fields
//!
//! ```ignore
//! use hydrate::{ActorContext, DataObject, DeclaredType, FieldDecl, Hydrator, SchemaBuilder};
//!
//! struct CreateTag;
//!
//! impl DataObject for CreateTag {
//!     fn declare() -> SchemaBuilder {
//!         SchemaBuilder::new("CreateTag")
//!             .field(FieldDecl::new("name", DeclaredType::String))
//!             .field(FieldDecl::new("aliases", DeclaredType::list(DeclaredType::String)))
//!     }
//! }
//!
//! let body = serde_json::json!({"name": "rust", "aliases": "rs, rust-lang"});
//! let tag = Hydrator::default().hydrate_json::<CreateTag>(&body, &ActorContext::anonymous())?;
//! assert_eq!(tag.get_as::<Vec<String>>("aliases")?, ["rs", "rust-lang"]);
//! ```

pub mod cli;
pub mod coerce;
pub mod config;
pub mod context;
pub mod defaults;
pub mod hydrator;
pub mod observability;
pub mod presence;
pub mod schema;
pub mod value;

pub use coerce::{CoercionError, CustomCast, TypeCoercer};
pub use config::{ConfigError, HydratorConfig};
pub use context::{ActorContext, Authorization, Settings, StaticSettings};
pub use defaults::{ApplyWhen, DefaultRule, GateDecision};
pub use hydrator::{
    FromHydrated, HydratedObject, HydrationError, HydrationResult, Hydrator, PartialObject,
    RawInput,
};
pub use presence::PresenceSet;
pub use schema::{
    BackedEnum, DataObject, DeclaredType, EnumType, FieldDecl, FieldDescriptor, Schema,
    SchemaBuilder, SchemaError, SchemaErrorCode, SchemaLoader, SchemaReflector, TypeTag,
};
pub use value::{Collection, EnumBacking, EnumMember, FromValue, Structured, Value};
