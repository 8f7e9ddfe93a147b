#![allow(dead_code, unused_imports)]

use std::sync::Arc;

use procrun::errors::ExecutionError;
use procrun::exec::{CommandSpec, ExecutionResult, LineSink, RunOptions, Supervisor};
use tokio_util::sync::CancellationToken;

pub use procrun_test_utils::builders::{OptionsBuilder, fast_config};
pub use procrun_test_utils::fakes::{CountingLauncher, CountingSink, RecordingSink};
pub use procrun_test_utils::{init_tracing, with_timeout, with_timeout_after};

pub type TestResult = Result<(), Box<dyn std::error::Error>>;

/// `sh -c <script>`.
pub fn sh(script: &str) -> CommandSpec {
    CommandSpec::new(["sh", "-c", script])
}

/// Run `spec` on a fast-timeout supervisor with a fresh token.
pub async fn run_with(
    spec: &CommandSpec,
    options: &RunOptions,
    sink: Arc<dyn LineSink>,
) -> Result<ExecutionResult, ExecutionError> {
    let supervisor = Supervisor::new(fast_config());
    supervisor
        .run(spec, options, sink, &CancellationToken::new())
        .await
}
