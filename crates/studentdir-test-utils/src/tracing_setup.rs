//! Tracing initialisation for tests.
//!
//! [`init_test_tracing`] routes events to the test-harness writer so they
//! show up only for failing tests. The subscriber is installed at most once
//! per process; later calls do nothing.

use tracing_subscriber::EnvFilter;

/// Install a subscriber honouring `RUST_LOG`, defaulting to `debug` for the
/// workspace crates and `warn` elsewhere.
pub fn init_test_tracing() {
    init_test_tracing_with("warn,studentdir_core=debug,studentdir_config=debug");
}

/// Like [`init_test_tracing`] with an explicit fallback filter.
pub fn init_test_tracing_with(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}
