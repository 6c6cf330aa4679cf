//! Diagnostic tracing for debugging `shai` itself.
//!
//! Progress meant for the operator is printed to stdout by the agent loop.
//! Tracing goes to stderr and is off below `warn` unless `RUST_LOG` says otherwise.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the global subscriber.
///
/// ```bash
/// RUST_LOG=shai=debug shai "list files"
/// ```
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .init();
}
