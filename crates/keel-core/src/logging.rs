//! Tracing subscriber setup.

use tracing_subscriber::EnvFilter;

/// Default filter when `RUST_LOG` is unset.
const DEFAULT_FILTER: &str = "info";

/// Initialize the global tracing subscriber.
///
/// Filtering is controlled by `RUST_LOG`, defaulting to `info`. Panics if a
/// global subscriber is already installed — call once at startup.
pub fn init() {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .init();
}

/// Fallible variant for tests and embedders that may already have a
/// subscriber installed. A second call is a no-op.
pub fn try_init() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .try_init();
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}
