// src/exec/launcher.rs

//! Starting child processes.
//!
//! The supervisor talks to a [`Launcher`] instead of calling
//! `tokio::process::Command` directly, so tests can wrap or replace the
//! production [`ProcessLauncher`] (for example to count spawns).

use std::process::{ExitStatus, Stdio};

use tokio::process::{Child, ChildStderr, ChildStdin, ChildStdout, Command};
use tracing::debug;

use crate::errors::ExecutionError;

use super::spec::CommandSpec;

/// How the child's standard streams are wired.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LaunchOptions {
    /// Pipe stderr so it can be drained alongside stdout. When false the
    /// child inherits the supervisor's stderr.
    pub merge_stderr: bool,
    /// Pipe stdin so input can be fed to the child. When false stdin is null.
    pub pipe_stdin: bool,
}

/// Trait abstracting how a command spec becomes a live process.
pub trait Launcher: Send + Sync {
    fn launch(
        &self,
        spec: &CommandSpec,
        options: &LaunchOptions,
    ) -> Result<RunningProcess, ExecutionError>;
}

/// Launcher backed by `tokio::process::Command`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessLauncher;

impl Launcher for ProcessLauncher {
    fn launch(
        &self,
        spec: &CommandSpec,
        options: &LaunchOptions,
    ) -> Result<RunningProcess, ExecutionError> {
        let program = spec.validate()?;

        let mut cmd = Command::new(program);
        cmd.args(spec.args());
        if let Some(dir) = spec.working_dir() {
            cmd.current_dir(dir);
        }
        for (key, value) in spec.envs() {
            cmd.env(key, value);
        }

        cmd.stdout(Stdio::piped())
            .stderr(if options.merge_stderr {
                Stdio::piped()
            } else {
                Stdio::inherit()
            })
            .stdin(if options.pipe_stdin {
                Stdio::piped()
            } else {
                Stdio::null()
            })
            .kill_on_drop(true);

        let child = cmd.spawn().map_err(|source| ExecutionError::LaunchFailure {
            program: program.to_string(),
            source,
        })?;

        debug!(program, pid = ?child.id(), ?options, "spawned child process");
        Ok(RunningProcess::new(program, child))
    }
}

/// Lifecycle of one child process as seen by its supervisor.
///
/// Only moves forward: `Running` becomes exactly one of the terminal states
/// and never returns to `Running`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessState {
    Running,
    Exited { code: i32, signal: Option<i32> },
    Failed,
}

/// One live child process, exclusively owned by the supervisor that
/// launched it.
#[derive(Debug)]
pub struct RunningProcess {
    program: String,
    pid: Option<u32>,
    child: Child,
    stdout: Option<ChildStdout>,
    stderr: Option<ChildStderr>,
    stdin: Option<ChildStdin>,
    state: ProcessState,
}

impl RunningProcess {
    pub fn new(program: impl Into<String>, mut child: Child) -> Self {
        Self {
            program: program.into(),
            pid: child.id(),
            stdout: child.stdout.take(),
            stderr: child.stderr.take(),
            stdin: child.stdin.take(),
            child,
            state: ProcessState::Running,
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// OS process id, captured at spawn time.
    pub fn pid(&self) -> Option<u32> {
        self.pid
    }

    pub fn state(&self) -> ProcessState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == ProcessState::Running
    }

    pub fn take_stdout(&mut self) -> Option<ChildStdout> {
        self.stdout.take()
    }

    pub fn take_stderr(&mut self) -> Option<ChildStderr> {
        self.stderr.take()
    }

    pub fn take_stdin(&mut self) -> Option<ChildStdin> {
        self.stdin.take()
    }

    /// Block until the child exits.
    pub async fn wait(&mut self) -> std::io::Result<ExitStatus> {
        let res = self.child.wait().await;
        self.observe(&res);
        res
    }

    /// Non-blocking check for exit.
    pub fn try_wait(&mut self) -> std::io::Result<Option<ExitStatus>> {
        let res = self.child.try_wait();
        match &res {
            Ok(Some(status)) => self.finish(*status),
            Ok(None) => {}
            Err(_) => self.fail(),
        }
        res
    }

    /// Force-kill the child and reap it.
    pub async fn kill(&mut self) -> std::io::Result<()> {
        self.child.kill().await?;
        // `Child::kill` reaps, so the status is available without blocking.
        if let Ok(Some(status)) = self.child.try_wait() {
            self.finish(status);
        }
        Ok(())
    }

    fn observe(&mut self, res: &std::io::Result<ExitStatus>) {
        match res {
            Ok(status) => self.finish(*status),
            Err(_) => self.fail(),
        }
    }

    fn finish(&mut self, status: ExitStatus) {
        if self.state == ProcessState::Running {
            self.state = ProcessState::Exited {
                code: exit_code(&status),
                signal: exit_signal(&status),
            };
        }
    }

    fn fail(&mut self) {
        if self.state == ProcessState::Running {
            self.state = ProcessState::Failed;
        }
    }
}

/// Numeric exit code, or `-1` when the child was terminated by a signal.
pub fn exit_code(status: &ExitStatus) -> i32 {
    status.code().unwrap_or(-1)
}

#[cfg(unix)]
pub fn exit_signal(status: &ExitStatus) -> Option<i32> {
    use std::os::unix::process::ExitStatusExt;
    status.signal()
}

#[cfg(not(unix))]
pub fn exit_signal(_status: &ExitStatus) -> Option<i32> {
    None
}
