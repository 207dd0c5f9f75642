//! `tracing` output for tests.

use std::sync::Once;

use tracing_subscriber::EnvFilter;

static INIT: Once = Once::new();

/// Install a global `tracing` subscriber that writes through the test
/// harness, so log lines are captured per test and shown on failure.
///
/// Safe to call from every test; only the first call installs anything. The
/// filter comes from `RUST_LOG`, defaulting to `debug`.
pub fn init_test_tracing() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));
        if let Err(e) = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init()
        {
            eprintln!("test tracing not installed: {e}");
        }
    });
}
