//! Structured logging setup using `tracing-subscriber`.
//!
//! Debug mode logs human-readable lines at `debug`; otherwise JSON lines at
//! `info`. `RUST_LOG` overrides the default level in both modes.

use tracing_subscriber::EnvFilter;

/// Default filter directive for the given mode.
#[must_use]
pub fn default_directive(debug: bool) -> &'static str {
    if debug { "debug" } else { "info" }
}

/// Install the global subscriber. Call once, before anything logs.
pub fn init(debug: bool) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive(debug)));

    if debug {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(env_filter)
            .init();
    }
}
