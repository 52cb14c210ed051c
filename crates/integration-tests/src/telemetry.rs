//! Tracing setup shared by every test binary.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Install the global subscriber once.
///
/// Filter comes from `RUST_LOG`, defaulting to `info` for this crate.
/// Output goes through the test writer so `cargo test` captures it per test.
pub fn init_tracing() {
    // A second call finds a subscriber already set; that is fine.
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "automation_exercise_integration_tests=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_test_writer())
        .try_init();
}
