//! Default resolution subsystem
//!
//! Fills fields the raw input did not supply.
//!
//! # Rules
//!
//! - `Constant`: a fixed value
//! - `GateConditioned`: picks a value from an authorization or settings check
//! - `Computed`: derives a value from fields hydrated earlier
//!
//! Rules run for absent keys, and also for empty input when marked with
//! `also_when_empty`.

mod resolver;
mod rule;

pub use resolver::DefaultResolver;
pub use rule::{ApplyWhen, ComputeFn, DefaultRule, GateDecision, RuleKind};
