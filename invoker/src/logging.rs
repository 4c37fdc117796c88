//! Tracing setup for the `wasm-invoker` binary.
//!
//! `wasm-invoker run` prints the engine's result, or a JSON report, on stdout
//! and scripts read it from there. Every log line therefore goes to stderr,
//! next to the CLI's own error messages. The library itself only emits
//! `tracing` events and never installs a subscriber.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the tracing subscriber.
///
/// Reads `RUST_LOG`. Defaults to `warn`, which keeps engine failures and
/// timeouts visible without any per-invocation noise.
///
/// # Example
/// ```bash
/// RUST_LOG=wasm_invoker=debug wasm-invoker run add.wasm add 1 2
/// ```
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .init();
}
