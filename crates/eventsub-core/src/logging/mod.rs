//! Structured logging with `tracing`.
//!
//! - [`init_subscriber`] installs a compact stderr subscriber
//! - [`init_json_subscriber`] installs a JSON-lines stderr subscriber
//! - [`capture_logs`] installs a thread-local capture layer for tests
//!
//! `RUST_LOG` always takes precedence over the level passed in.

pub mod test_utils;

pub use test_utils::{CapturedEvent, CapturedLogs, capture_logs};

use tracing_subscriber::EnvFilter;

fn filter_for(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
}

/// Initialize the global tracing subscriber with compact stderr output.
///
/// Subsequent calls are no-ops.
pub fn init_subscriber(level: &str) {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter_for(level))
        .with_target(true)
        .with_writer(std::io::stderr)
        .compact();

    // try_init fails if a global subscriber is already set
    let _ = subscriber.try_init();
}

/// Initialize the global tracing subscriber with JSON-lines stderr output.
///
/// Subsequent calls are no-ops.
pub fn init_json_subscriber(level: &str) {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter_for(level))
        .with_target(true)
        .with_writer(std::io::stderr)
        .json();

    let _ = subscriber.try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_subscriber_is_idempotent() {
        init_subscriber("warn");
        init_subscriber("debug");
        init_json_subscriber("info");
    }
}
