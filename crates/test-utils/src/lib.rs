//! Shared helpers for procrun's integration tests.
//!
//! - [`builders`]: run options and a short-timeout supervisor config.
//! - [`fakes`]: sinks that record or count lines, and a spawn-counting
//!   launcher.

pub mod builders;
pub mod fakes;

use std::future::Future;
use std::sync::Once;
use std::time::Duration;

use tracing_subscriber::{EnvFilter, fmt};

/// Generous enough for the multi-megabyte output tests on a slow machine.
pub const DEFAULT_TEST_TIMEOUT: Duration = Duration::from_secs(30);

static INIT: Once = Once::new();

/// Install a per-test tracing subscriber once per test binary.
///
/// Output goes through `with_test_writer()`, so the harness shows it only
/// for failing tests (or with `--nocapture`). The filter is read from
/// `PROCRUN_LOG`, then `RUST_LOG`, defaulting to debug for procrun itself:
///
/// `PROCRUN_LOG=procrun::exec=trace cargo test -- --nocapture`
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env("PROCRUN_LOG")
            .or_else(|_| EnvFilter::try_from_default_env())
            .unwrap_or_else(|_| EnvFilter::new("procrun=debug,warn"));

        // Another harness may already own the global subscriber.
        let _ = fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .try_init();
    });
}

/// Await `f`, failing the test after [`DEFAULT_TEST_TIMEOUT`].
///
/// A supervisor that deadlocks on a full pipe shows up as this panic rather
/// than a hung test run.
pub async fn with_timeout<F, T>(f: F) -> T
where
    F: Future<Output = T>,
{
    with_timeout_after(DEFAULT_TEST_TIMEOUT, f).await
}

/// Like [`with_timeout`] with an explicit limit.
pub async fn with_timeout_after<F, T>(limit: Duration, f: F) -> T
where
    F: Future<Output = T>,
{
    match tokio::time::timeout(limit, f).await {
        Ok(out) => out,
        Err(_) => panic!("test did not finish within {limit:?}"),
    }
}
