//! Tracing setup for the CLI and tests.
//!
//! The filter is taken from `FITPLAN_LOG`, then `RUST_LOG`, then the level
//! passed by the caller.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Environment variable checked before `RUST_LOG`
pub const LOG_ENV: &str = "FITPLAN_LOG";

fn env_filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(default_level))
}

/// Log at INFO unless the environment says otherwise
pub fn init() {
    init_with_level("info")
}

/// Install a compact stderr subscriber with `default_level` as fallback
///
/// Calling this twice keeps the first subscriber.
pub fn init_with_level(default_level: &str) {
    let layer = fmt::layer()
        .compact()
        .with_target(false)
        .with_writer(std::io::stderr);

    if tracing_subscriber::registry()
        .with(env_filter(default_level))
        .with(layer)
        .try_init()
        .is_err()
    {
        tracing::debug!("Tracing subscriber already installed");
    }
}

#[cfg(test)]
pub fn init_test() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter(env_filter("debug"))
        .try_init();
}
