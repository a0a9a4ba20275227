//! Optional tracing-subscriber initialization.
//!
//! Behind the default-on `logging` feature so library embedders that run
//! their own subscriber can opt out and keep `tracing-subscriber` off
//! their dependency tree.

/// Installs a formatting subscriber with `RUST_LOG`-driven filtering
/// (default level `info`).
///
/// Call once at process startup; a second call is a no-op rather than a
/// panic so tests and embedders can race it safely.
pub fn init() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
