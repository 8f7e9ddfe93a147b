// src/exec/spec.rs

//! Command description and per-run options.

use std::fmt;
use std::path::PathBuf;

use crate::errors::ExecutionError;

/// An executable plus its arguments, treated as one immutable unit of work.
///
/// The first element is the program (or shell), the rest are its arguments.
/// An empty spec can be built but is rejected by the launcher with
/// [`ExecutionError::InvalidCommand`] before any process is spawned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    argv: Vec<String>,
    cwd: Option<PathBuf>,
    env: Vec<(String, String)>,
}

impl CommandSpec {
    pub fn new<I, S>(argv: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            argv: argv.into_iter().map(Into::into).collect(),
            cwd: None,
            env: Vec::new(),
        }
    }

    /// Run the command through the platform shell (`sh -c` / `cmd /C`).
    pub fn shell(line: impl Into<String>) -> Self {
        if cfg!(windows) {
            Self::new(["cmd".to_string(), "/C".to_string(), line.into()])
        } else {
            Self::new(["sh".to_string(), "-c".to_string(), line.into()])
        }
    }

    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }

    pub fn argv(&self) -> &[String] {
        &self.argv
    }

    pub fn program(&self) -> Option<&str> {
        self.argv.first().map(String::as_str)
    }

    pub fn args(&self) -> &[String] {
        self.argv.get(1..).unwrap_or(&[])
    }

    pub fn working_dir(&self) -> Option<&PathBuf> {
        self.cwd.as_ref()
    }

    pub fn envs(&self) -> &[(String, String)] {
        &self.env
    }

    /// Check the command can be handed to the OS.
    pub fn validate(&self) -> Result<&str, ExecutionError> {
        let program = self
            .program()
            .ok_or_else(|| ExecutionError::InvalidCommand("command spec is empty".to_string()))?;

        if program.is_empty() {
            return Err(ExecutionError::InvalidCommand(
                "program name is empty".to_string(),
            ));
        }

        if let Some(idx) = self.argv.iter().position(|a| a.contains('\0')) {
            return Err(ExecutionError::InvalidCommand(format!(
                "argument {idx} contains a NUL byte"
            )));
        }

        Ok(program)
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.argv.join(" "))
    }
}

/// Options for a single supervised run.
///
/// - `collect`: retain every line in `ExecutionResult::lines` (collecting
///   mode) instead of forwarding to the sink (streaming mode).
/// - `merge_stderr`: pipe stderr into the drained line sequence instead of
///   inheriting the supervisor's own stderr.
/// - `skip_first_line`: streaming mode only; discard the very first line
///   (for tools that print a header row).
/// - `input`: bytes written to the child's stdin, which is then closed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunOptions {
    pub collect: bool,
    pub merge_stderr: bool,
    pub skip_first_line: bool,
    pub input: Option<Vec<u8>>,
}

impl RunOptions {
    pub fn streaming() -> Self {
        Self::default()
    }

    pub fn collecting() -> Self {
        Self {
            collect: true,
            ..Self::default()
        }
    }
}
