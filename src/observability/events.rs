//! Observability events
//!
//! Every log line emitted by the crate carries one of these as its `event`
//! field. Events are explicit and typed.

use std::fmt;

/// Observable events
///
/// - Schema lifecycle
/// - Hydration lifecycle
/// - Per-field decisions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Schema lifecycle
    /// Schema built from a declaration and cached
    SchemaReflected,
    /// Schema served from the cache
    SchemaCacheHit,
    /// Schema documents loaded from disk
    SchemasLoaded,

    // Hydration lifecycle
    /// Hydration of one object begins
    HydrationStart,
    /// Hydration of one object complete
    HydrationComplete,
    /// Hydration aborted with an error
    HydrationFailed,

    // Fields
    /// Present field coerced (or cast)
    FieldCoerced,
    /// Default rule evaluated
    DefaultResolved,
    /// Default value stored in a slot
    DefaultApplied,
    /// Nullable field left without a value
    FieldAbsent,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::SchemaReflected => "SCHEMA_REFLECTED",
            Event::SchemaCacheHit => "SCHEMA_CACHE_HIT",
            Event::SchemasLoaded => "SCHEMAS_LOADED",

            Event::HydrationStart => "HYDRATION_BEGIN",
            Event::HydrationComplete => "HYDRATION_COMPLETE",
            Event::HydrationFailed => "HYDRATION_FAILED",

            Event::FieldCoerced => "FIELD_COERCED",
            Event::DefaultResolved => "DEFAULT_RESOLVED",
            Event::DefaultApplied => "DEFAULT_APPLIED",
            Event::FieldAbsent => "FIELD_ABSENT",
        }
    }

    /// Returns true if the event reports a failure
    pub fn is_failure(&self) -> bool {
        matches!(self, Event::HydrationFailed)
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_strings() {
        assert_eq!(Event::HydrationStart.as_str(), "HYDRATION_BEGIN");
        assert_eq!(Event::SchemaCacheHit.to_string(), "SCHEMA_CACHE_HIT");
    }

    #[test]
    fn test_failure_events() {
        assert!(Event::HydrationFailed.is_failure());
        assert!(!Event::HydrationComplete.is_failure());
    }
}
