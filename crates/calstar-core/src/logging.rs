//! Logging and tracing initialization.
//!
//! The level is controlled by the `RUST_LOG` environment variable:
//!
//! ```bash
//! # Show every persistence-layer event and request trace
//! RUST_LOG=calstar_core=debug,tower_http=debug calstar serve
//!
//! # Production
//! RUST_LOG=warn calstar serve
//! ```

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize logging with sensible defaults (`info` unless `RUST_LOG` says otherwise).
///
/// # Panics
///
/// Panics if a global subscriber is already installed. Call it once at startup.
pub fn init_logging() {
    init_logging_with_level("info");
}

/// Initialize logging with a fallback level used when `RUST_LOG` is unset.
///
/// # Panics
///
/// Panics if a global subscriber is already installed.
pub fn init_logging_with_level(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Initialize JSON-formatted logging, for log aggregation in production.
///
/// # Panics
///
/// Panics if a global subscriber is already installed.
pub fn init_logging_json() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().json())
        .init();
}
