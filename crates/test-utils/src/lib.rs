//! Shared helpers for `posixkit` integration tests.

pub mod builders;
pub mod recording_executor;

use std::future::Future;
use std::time::Duration;

use tracing_subscriber::{fmt, EnvFilter};

pub use recording_executor::RecordingExecutor;

/// Upper bound for a single test step. A deadlocked pipe trips this
/// instead of hanging the whole run.
pub const TEST_DEADLINE: Duration = Duration::from_secs(10);

/// Route `tracing` output through the test harness's capture.
///
/// The filter comes from `POSIXKIT_LOG`, the same variable the binary
/// reads, and defaults to `debug` for our own targets. Repeated calls are
/// no-ops: the first test to get here installs the subscriber.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_env("POSIXKIT_LOG")
        .unwrap_or_else(|_| EnvFilter::new("posixkit=debug,warn"));

    let _ = fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .with_target(true)
        .try_init();
}

/// Await `fut`, panicking if it takes longer than [`TEST_DEADLINE`].
pub async fn with_timeout<F: Future>(fut: F) -> F::Output {
    match tokio::time::timeout(TEST_DEADLINE, fut).await {
        Ok(out) => out,
        Err(_) => panic!("step still pending after {:?}", TEST_DEADLINE),
    }
}
