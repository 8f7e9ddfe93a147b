// src/exec/supervisor.rs

//! Supervised execution of a single child process.
//!
//! `Supervisor::run` drives one run through
//! `NotStarted -> Running -> {Completed | LaunchFailed | WaitInterrupted}`:
//!
//! 1. validate and launch the command,
//! 2. spawn one drain task per piped stream plus the line consumer,
//! 3. wait for the child to exit, or for the caller's cancellation token,
//! 4. join the drains within `drain_timeout` (cancelling them if needed),
//! 5. release the streams and the process handle, then report.

use std::sync::Arc;
use std::time::Duration;

use tokio::io::AsyncWriteExt;
use tokio::process::{ChildStderr, ChildStdin, ChildStdout};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::errors::ExecutionError;
use crate::types::{StreamKind, TextEncoding};

use super::drain::{ConsumeOptions, Consumed, DrainReport, spawn_consumer, spawn_drain};
use super::launcher::{LaunchOptions, Launcher, ProcessLauncher, exit_code, exit_signal};
use super::sink::LineSink;
use super::spec::{CommandSpec, RunOptions};
use super::terminate::{TerminationPath, terminate};

/// Largest accepted `channel_capacity`.
pub const MAX_CHANNEL_CAPACITY: usize = 1 << 20;

/// Settings shared by every run of a [`Supervisor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SupervisorConfig {
    pub encoding: TextEncoding,
    /// Time a cancelled child gets to exit after SIGTERM before it is killed.
    pub grace_period: Duration,
    /// Upper bound on waiting for the drains once the child is gone.
    pub drain_timeout: Duration,
    /// Capacity of the channel between drains and the line consumer,
    /// clamped to `1..=MAX_CHANNEL_CAPACITY`.
    pub channel_capacity: usize,
}

impl Default for SupervisorConfig {
    fn default() -> Self {
        Self {
            encoding: TextEncoding::Utf8,
            grace_period: Duration::from_secs(3),
            drain_timeout: Duration::from_secs(2),
            channel_capacity: 256,
        }
    }
}

/// Whether the drains observed end-of-input before the run was reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrainStatus {
    Complete,
    /// The drains were still running after `drain_timeout` (typically a
    /// grandchild kept the pipe open) and were cancelled. Lines after that
    /// point were not observed.
    Incomplete,
}

/// Terminal artifact of a run that launched and exited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionResult {
    /// Captured lines in arrival order (collecting mode only).
    pub lines: Vec<String>,
    /// Exit code, `-1` if the child was killed by a signal.
    pub exit_code: i32,
    pub signal: Option<i32>,
    /// Lines handed to the sink (streaming mode only).
    pub forwarded: usize,
    /// Lines that needed replacement characters to decode.
    pub replaced_lines: usize,
    pub drain: DrainStatus,
}

impl ExecutionResult {
    pub fn success(&self) -> bool {
        self.exit_code == 0 && self.signal.is_none()
    }
}

/// Where a run ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    NotStarted,
    Running,
    Completed(i32),
    LaunchFailed,
    WaitInterrupted,
}

impl RunState {
    /// Terminal state of a finished run.
    pub fn of(outcome: &Result<ExecutionResult, ExecutionError>) -> Self {
        match outcome {
            Ok(result) => RunState::Completed(result.exit_code),
            Err(ExecutionError::InvalidCommand(_)) => RunState::NotStarted,
            Err(ExecutionError::LaunchFailure { .. }) => RunState::LaunchFailed,
            Err(ExecutionError::Interrupted { .. }) | Err(ExecutionError::Wait(_)) => {
                RunState::WaitInterrupted
            }
        }
    }
}

/// Stateless service that runs commands under supervision.
///
/// Holds only configuration and a launcher, so one instance can be shared by
/// reference across callers.
#[derive(Debug, Clone)]
pub struct Supervisor<L: Launcher = ProcessLauncher> {
    launcher: L,
    config: SupervisorConfig,
}

impl Supervisor<ProcessLauncher> {
    pub fn new(config: SupervisorConfig) -> Self {
        Self::with_launcher(ProcessLauncher, config)
    }
}

impl Default for Supervisor<ProcessLauncher> {
    fn default() -> Self {
        Self::new(SupervisorConfig::default())
    }
}

impl<L: Launcher> Supervisor<L> {
    pub fn with_launcher(launcher: L, config: SupervisorConfig) -> Self {
        Self { launcher, config }
    }

    pub fn config(&self) -> &SupervisorConfig {
        &self.config
    }

    pub fn launcher(&self) -> &L {
        &self.launcher
    }

    /// Run `spec` to completion.
    ///
    /// - `sink` receives lines in streaming mode; it is unused when
    ///   `options.collect` is set.
    /// - Cancelling `cancel` while the child runs terminates it (SIGTERM,
    ///   then kill after `grace_period`) and yields
    ///   [`ExecutionError::Interrupted`].
    ///
    /// A non-zero exit is reported through [`ExecutionResult::exit_code`],
    /// never as an error.
    pub async fn run(
        &self,
        spec: &CommandSpec,
        options: &RunOptions,
        sink: Arc<dyn LineSink>,
        cancel: &CancellationToken,
    ) -> Result<ExecutionResult, ExecutionError> {
        let program = spec.validate()?.to_string();

        let launch = LaunchOptions {
            merge_stderr: options.merge_stderr,
            pipe_stdin: options.input.is_some(),
        };
        let mut process = self.launcher.launch(spec, &launch)?;
        info!(
            program = %program,
            pid = ?process.pid(),
            collect = options.collect,
            merge_stderr = options.merge_stderr,
            "child process started"
        );

        let (tx, rx) = mpsc::channel(self.config.channel_capacity.clamp(1, MAX_CHANNEL_CAPACITY));
        let drain_cancel = CancellationToken::new();
        let mut drains = Drains {
            stdout: process.take_stdout().map(|r| {
                spawn_drain(r, StreamKind::Stdout, self.config.encoding, tx.clone(), drain_cancel.clone())
            }),
            stderr: process.take_stderr().map(|r| {
                spawn_drain(r, StreamKind::Stderr, self.config.encoding, tx.clone(), drain_cancel.clone())
            }),
            cancel: drain_cancel,
            summary: DrainSummary::default(),
        };
        // The consumer ends once every drain has dropped its sender.
        drop(tx);

        let mut consumer = spawn_consumer(
            rx,
            ConsumeOptions {
                collect: options.collect,
                skip_first_line: options.skip_first_line,
            },
            sink,
        );

        let writer = match (process.take_stdin(), options.input.clone()) {
            (Some(stdin), Some(data)) => Some(tokio::spawn(feed_stdin(stdin, data))),
            _ => None,
        };

        let waited = tokio::select! {
            status = process.wait() => Some(status),
            _ = cancel.cancelled() => None,
        };

        let outcome = match waited {
            Some(Ok(status)) => Ok(status),
            Some(Err(e)) => Err(ExecutionError::Wait(e)),
            None => {
                info!(program = %program, pid = ?process.pid(), "run cancelled; terminating child");
                match terminate(&mut process, self.config.grace_period).await {
                    Ok(termination) => Err(ExecutionError::Interrupted { termination }),
                    Err(e) => Err(e),
                }
            }
        };

        if let Some(writer) = writer {
            if !writer.is_finished() {
                writer.abort();
            }
        }

        let drained = drains.join(self.config.drain_timeout).await;
        let (consumed, delivered) = match timeout(self.config.drain_timeout, &mut consumer).await {
            Ok(Ok(consumed)) => (consumed, true),
            Ok(Err(e)) => {
                warn!(program = %program, error = %e, "line consumer task failed");
                (Consumed::default(), false)
            }
            Err(_) => {
                // The sink is stuck; its thread is left to finish on its own.
                warn!(program = %program, "line consumer did not finish; abandoning it");
                consumer.abort();
                (Consumed::default(), false)
            }
        };

        // Streams are already closed; this releases the process handle.
        drop(process);

        let status = match outcome {
            Ok(status) => status,
            Err(e) => {
                warn!(program = %program, error = %e, "run did not complete");
                return Err(e);
            }
        };

        let result = ExecutionResult {
            lines: consumed.lines,
            exit_code: exit_code(&status),
            signal: exit_signal(&status),
            forwarded: consumed.forwarded,
            replaced_lines: drains.summary.replaced,
            drain: if drained && delivered {
                DrainStatus::Complete
            } else {
                DrainStatus::Incomplete
            },
        };

        info!(
            program = %program,
            exit_code = result.exit_code,
            signal = ?result.signal,
            lines = drains.summary.lines,
            skipped = consumed.skipped,
            drain = ?result.drain,
            "child process exited"
        );

        Ok(result)
    }

    /// Convenience wrapper: collecting mode, no cancellation.
    pub async fn output(&self, spec: &CommandSpec) -> Result<ExecutionResult, ExecutionError> {
        let sink: Arc<dyn LineSink> = Arc::new(super::sink::NullSink);
        self.run(spec, &RunOptions::collecting(), sink, &CancellationToken::new())
            .await
    }
}

#[derive(Debug, Default)]
struct DrainSummary {
    lines: usize,
    replaced: usize,
}

/// Join handles for the drain tasks of one run.
struct Drains {
    stdout: Option<JoinHandle<DrainReport<ChildStdout>>>,
    stderr: Option<JoinHandle<DrainReport<ChildStderr>>>,
    cancel: CancellationToken,
    summary: DrainSummary,
}

impl Drains {
    /// Wait for both drains, at most `bound` before cancelling them and at
    /// most `bound` again before aborting. Returns true if every drain
    /// reached end-of-input.
    async fn join(&mut self, bound: Duration) -> bool {
        if timeout(bound, self.join_all()).await.is_ok() {
            return true;
        }

        warn!(
            bound_ms = bound.as_millis() as u64,
            "output drains still running after child exit; cancelling"
        );
        self.cancel.cancel();

        if timeout(bound, self.join_all()).await.is_err() {
            warn!("output drains did not stop after cancellation; aborting");
            if let Some(h) = self.stdout.take() {
                h.abort();
            }
            if let Some(h) = self.stderr.take() {
                h.abort();
            }
        }
        false
    }

    async fn join_all(&mut self) {
        if let Some(handle) = self.stdout.as_mut() {
            let res = handle.await;
            self.stdout = None;
            self.absorb(res);
        }
        if let Some(handle) = self.stderr.as_mut() {
            let res = handle.await;
            self.stderr = None;
            self.absorb(res);
        }
    }

    fn absorb<R>(&mut self, res: Result<DrainReport<R>, tokio::task::JoinError>) {
        match res {
            Ok(report) => {
                self.summary.lines += report.lines;
                self.summary.replaced += report.replaced;
                debug!(stream = ?report.stream, lines = report.lines, "closing drained stream");
                drop(report.reader);
            }
            Err(e) => warn!(error = %e, "drain task failed"),
        }
    }
}

async fn feed_stdin(mut stdin: ChildStdin, data: Vec<u8>) {
    if let Err(e) = stdin.write_all(&data).await {
        debug!(error = %e, "child stopped reading stdin");
        return;
    }
    if let Err(e) = stdin.shutdown().await {
        debug!(error = %e, "closing child stdin failed");
    }
}

/// Outcome of cancelling a run, kept for callers that only need the path.
pub fn termination_of(err: &ExecutionError) -> Option<TerminationPath> {
    match err {
        ExecutionError::Interrupted { termination } => Some(*termination),
        _ => None,
    }
}
