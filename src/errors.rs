// src/errors.rs

//! Crate-wide error types.
//!
//! - [`ExecutionError`] covers the supervised run of a single child process.
//! - [`HostError`] covers the host collaborators (clipboard, desktop-open,
//!   filesystem metadata, time formatting).
//! - [`ProcrunError`] is the umbrella type used by config loading and the CLI.

use std::path::PathBuf;

use thiserror::Error;

use crate::exec::TerminationPath;

/// Failure of a supervised run.
///
/// A child that was launched and exited with a non-zero code is *not* an
/// `ExecutionError`; that is reported through `ExecutionResult::exit_code`.
#[derive(Error, Debug)]
pub enum ExecutionError {
    /// The command spec was empty or malformed. No process was spawned.
    #[error("invalid command: {0}")]
    InvalidCommand(String),

    /// The OS refused to start the child (not found, permission denied, ...).
    #[error("failed to launch '{program}': {source}")]
    LaunchFailure {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The supervising context was cancelled while waiting for the child.
    #[error("run interrupted while waiting for child ({termination})")]
    Interrupted { termination: TerminationPath },

    /// Waiting on the child failed at the OS level.
    #[error("waiting for child process failed: {0}")]
    Wait(#[source] std::io::Error),
}

/// Failure of a host collaborator call.
#[derive(Error, Debug)]
pub enum HostError {
    /// The facility exists on this platform but cannot be reached right now
    /// (headless session, helper tool missing).
    #[error("platform facility unavailable: {0}")]
    PlatformUnavailable(String),

    /// The facility does not exist on this platform.
    #[error("platform facility unsupported: {0}")]
    PlatformUnsupported(String),

    #[error("invalid date/time format pattern: {0:?}")]
    InvalidFormat(String),

    #[error("I/O error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Execution(#[from] ExecutionError),
}

#[derive(Error, Debug)]
pub enum ProcrunError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error(transparent)]
    Execution(#[from] ExecutionError),

    #[error(transparent)]
    Host(#[from] HostError),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, ProcrunError>;
