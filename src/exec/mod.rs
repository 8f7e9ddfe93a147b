// src/exec/mod.rs

//! Process execution layer.
//!
//! This module starts one external command with `tokio::process::Command`,
//! drains its output concurrently with the wait for exit, and reports the
//! outcome.
//!
//! - [`spec`] holds `CommandSpec` and the per-run `RunOptions`.
//! - [`launcher`] provides the `Launcher` trait, the production
//!   `ProcessLauncher`, and the `RunningProcess` handle.
//! - [`drain`] turns output streams into lines on independent tasks.
//! - [`sink`] defines where streamed lines go.
//! - [`terminate`] stops a child on cancellation (graceful, then forced).
//! - [`supervisor`] ties it together in `Supervisor::run`.

pub mod drain;
pub mod launcher;
pub mod sink;
pub mod spec;
pub mod supervisor;
pub mod terminate;

pub use drain::OutputLine;
pub use launcher::{LaunchOptions, Launcher, ProcessLauncher, ProcessState, RunningProcess};
pub use sink::{ConsoleSink, LineSink, NullSink};
pub use spec::{CommandSpec, RunOptions};
pub use supervisor::{
    DrainStatus, ExecutionResult, MAX_CHANNEL_CAPACITY, RunState, Supervisor, SupervisorConfig,
    termination_of,
};
pub use terminate::TerminationPath;
