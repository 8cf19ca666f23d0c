//! Hydration subsystem
//!
//! Drives raw input through presence tracking, coercion and default
//! resolution, and assembles immutable `HydratedObject`s.
//!
//! # Design Principles
//!
//! - One pass over the schema, in declaration order
//! - First error aborts; partial objects are never exposed
//! - Explicitly supplied and default-filled fields stay distinguishable
//! - Field values never appear in logs

mod errors;
mod hydrator;
mod input;
mod object;

pub use errors::{HydrationError, HydrationResult};
pub use hydrator::Hydrator;
pub use input::RawInput;
pub use object::{FromHydrated, HydratedObject, PartialObject};
