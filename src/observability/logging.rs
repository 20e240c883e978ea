//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the global tracing subscriber once at startup
//! - Let `RUST_LOG` override the configured filter
//!
//! # Design Decisions
//! - Uses tracing crate for structured logging
//! - Human-readable fmt output on stderr/stdout, one line per event

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the global subscriber.
///
/// `fallback` is used when `RUST_LOG` is unset or unparsable.
pub fn init(fallback: &str) {
    tracing_subscriber::registry()
        .with(filter(fallback))
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn filter(fallback: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback))
}
