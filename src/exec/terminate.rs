// src/exec/terminate.rs

//! Stopping a child that is still running when its run is cancelled.

use std::fmt;
use std::time::Duration;

use tokio::time::timeout;
use tracing::{debug, info, warn};

use crate::errors::ExecutionError;

use super::launcher::RunningProcess;

/// How a cancelled child ended up stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminationPath {
    /// The child had already exited when cancellation arrived.
    AlreadyExited,
    /// The child exited within the grace period after a termination request.
    Graceful,
    /// The grace period elapsed (or graceful requests are unsupported) and the
    /// child was killed.
    Forced,
}

impl fmt::Display for TerminationPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TerminationPath::AlreadyExited => "child had already exited",
            TerminationPath::Graceful => "child terminated gracefully",
            TerminationPath::Forced => "child was force-killed",
        };
        f.write_str(s)
    }
}

/// Ask the child to stop, wait up to `grace`, then kill it.
pub async fn terminate(
    process: &mut RunningProcess,
    grace: Duration,
) -> Result<TerminationPath, ExecutionError> {
    if process.try_wait().map_err(ExecutionError::Wait)?.is_some() {
        debug!(program = process.program(), "child already exited before termination");
        return Ok(TerminationPath::AlreadyExited);
    }

    if request_stop(process) {
        info!(
            program = process.program(),
            pid = ?process.pid(),
            grace_ms = grace.as_millis() as u64,
            "sent termination request to child"
        );

        match timeout(grace, process.wait()).await {
            Ok(Ok(status)) => {
                debug!(program = process.program(), %status, "child exited within grace period");
                return Ok(TerminationPath::Graceful);
            }
            Ok(Err(e)) => return Err(ExecutionError::Wait(e)),
            Err(_) => {
                warn!(
                    program = process.program(),
                    pid = ?process.pid(),
                    "grace period elapsed; killing child"
                );
            }
        }
    }

    process.kill().await.map_err(ExecutionError::Wait)?;
    Ok(TerminationPath::Forced)
}

/// Send SIGTERM. Returns false if no request could be delivered.
#[cfg(unix)]
fn request_stop(process: &RunningProcess) -> bool {
    use nix::sys::signal::{Signal, kill};
    use nix::unistd::Pid;

    let Some(pid) = process.pid().and_then(|p| i32::try_from(p).ok()) else {
        return false;
    };

    match kill(Pid::from_raw(pid), Signal::SIGTERM) {
        Ok(()) => true,
        Err(e) => {
            warn!(pid, error = %e, "failed to send SIGTERM");
            false
        }
    }
}

#[cfg(not(unix))]
fn request_stop(_process: &RunningProcess) -> bool {
    false
}
