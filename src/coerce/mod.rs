//! Type coercion subsystem
//!
//! Turns raw input values into declared field types.
//!
//! # Design Principles
//!
//! - Pure: output depends only on the raw value, the field, and the
//!   configured delimiter
//! - Idempotent: coercing a coerced value changes nothing
//! - Conservative: unknown combinations pass through unchanged
//! - Parsing failures are errors, never silent nulls

mod cast;
mod coercer;
mod errors;
mod structured;
mod temporal;

pub use cast::{CustomCast, Lowercase};
pub use coercer::{NestedHydrate, TypeCoercer};
pub use errors::{CoercionError, CoercionResult};
pub use structured::promote;
pub use temporal::parse_temporal;
