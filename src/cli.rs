// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Command-line arguments for `procrun`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "procrun",
    version,
    about = "Run a command under supervision and stream or collect its output.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the config file (TOML).
    ///
    /// Default: `procrun.toml` in the current working directory, if present.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `PROCRUN_LOG` or a default level will be used.
    #[arg(long, global = true, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Run a command; exits with the command's exit code.
    Run(RunArgs),
    /// List system processes (without the header row).
    Ps,
    /// Print OS name, home and working directory, user and keyboard layout.
    Info,
    /// Print the current date/time.
    Now(NowArgs),
    /// Print name, access flags and capacity of a path's filesystem.
    Space {
        #[arg(value_name = "PATH")]
        path: PathBuf,
    },
    /// Open a file (or, with --folder, a directory) in the desktop shell.
    Open {
        #[arg(value_name = "PATH")]
        path: PathBuf,
        #[arg(long)]
        folder: bool,
    },
    /// Read or write the system clipboard.
    Clip {
        #[command(subcommand)]
        action: ClipAction,
    },
}

#[derive(Debug, Clone, Args)]
pub struct RunArgs {
    /// Collect output and print it after the command exits.
    #[arg(long)]
    pub collect: bool,

    /// Drain stderr into the same line stream as stdout.
    #[arg(long)]
    pub merge_stderr: bool,

    /// Drop the first output line (streaming mode only).
    #[arg(long)]
    pub skip_first_line: bool,

    /// Program and arguments, e.g. `procrun run -- ls -l /tmp`.
    #[arg(
        value_name = "CMD",
        required = true,
        trailing_var_arg = true,
        allow_hyphen_values = true
    )]
    pub command: Vec<String>,
}

#[derive(Debug, Clone, Args)]
pub struct NowArgs {
    /// strftime-style pattern, e.g. "%Y-%m-%d %H:%M".
    #[arg(long, value_name = "PATTERN", conflicts_with_all = ["time", "date"])]
    pub format: Option<String>,

    /// HH:MM:SS (default).
    #[arg(long, conflicts_with = "date")]
    pub time: bool,

    /// YYYY/MM/DD.
    #[arg(long)]
    pub date: bool,
}

#[derive(Debug, Clone, Subcommand)]
pub enum ClipAction {
    /// Put TEXT on the clipboard.
    Copy {
        #[arg(value_name = "TEXT")]
        text: String,
    },
    /// Print the clipboard text.
    Paste,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
