//! Observability subsystem
//!
//! - Structured logging through `tracing`, one typed `Event` per line
//! - Field names and type categories only, never field values
//! - Logging is read-only and never changes a hydration result
//!
//! # Usage
//!
//! ```ignore
//! use hydrate::observability::{self, Event};
//!
//! observability::init();
//! tracing::info!(event = %Event::SchemasLoaded, count = 3, "schemas loaded");
//! ```

mod events;

pub use events::Event;

use std::sync::OnceLock;

use tracing_subscriber::EnvFilter;

static INITIALIZED: OnceLock<()> = OnceLock::new();

/// Default filter when `RUST_LOG` is unset
pub const DEFAULT_FILTER: &str = "warn";

/// Installs a `fmt` subscriber writing to stderr, filtered by `RUST_LOG`.
///
/// Calling it again, or after another subscriber was installed, is a no-op.
pub fn init() {
    INITIALIZED.get_or_init(|| {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
        // another global subscriber may already be set
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init();
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_is_idempotent() {
        init();
        init();
        tracing::debug!(event = %Event::HydrationStart, "still logging");
    }
}
