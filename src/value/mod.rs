//! Value domain for hydration
//!
//! Raw input and hydrated output share one closed enum so that every
//! coercion result is itself a valid coercion input.

mod convert;
mod extract;
mod types;

pub use extract::FromValue;
pub use types::{Collection, EnumBacking, EnumMember, Structured, Value};
