// src/lib.rs

pub mod cli;
pub mod config;
pub mod errors;
pub mod exec;
pub mod host;
pub mod logging;
pub mod types;

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::cli::{ClipAction, CliArgs, Command, NowArgs, RunArgs};
use crate::config::ConfigFile;
use crate::errors::ExecutionError;
use crate::exec::{
    CommandSpec, ConsoleSink, ExecutionResult, LineSink, RunOptions, RunState, Supervisor,
    termination_of,
};
use crate::host::{
    CommandClipboard, DesktopShell, EntryKind, Environment, KeyboardLayout, LocaleKeyboard,
    OpenOutcome, SystemClock, SystemEnvironment, SystemVolumes, TimeDate, VolumeInfo,
};

/// High-level entry point used by `main.rs`.
///
/// Loads config, builds the supervisor and dispatches the subcommand.
/// Returns the exit code the process should terminate with.
pub async fn run(args: CliArgs) -> Result<i32> {
    let cfg = load_config(args.config.as_deref())?;
    let supervisor = Supervisor::new(cfg.supervisor);

    match args.command {
        Command::Run(run_args) => run_command(&supervisor, &cfg, run_args).await,
        Command::Ps => list_processes(&supervisor).await,
        Command::Info => {
            print_info(&SystemEnvironment, &LocaleKeyboard);
            Ok(0)
        }
        Command::Now(now) => print_now(&now),
        Command::Space { path } => print_space(&SystemVolumes, &path),
        Command::Open { path, folder } => {
            let kind = if folder { EntryKind::Folder } else { EntryKind::File };
            open_path(DesktopShell::detect(supervisor), &path, kind).await
        }
        Command::Clip { action } => clip(CommandClipboard::detect(supervisor), action).await,
    }
}

fn load_config(path: Option<&Path>) -> Result<ConfigFile> {
    let (path, explicit) = match path {
        Some(p) => (p.to_path_buf(), true),
        None => (config::default_config_path(), false),
    };
    let cfg = config::load_or_default(&path, explicit)
        .with_context(|| format!("loading config {}", path.display()))?;
    debug!(?cfg, "configuration loaded");
    Ok(cfg)
}

/// Cancel `token` on Ctrl-C.
fn cancel_on_ctrl_c(token: CancellationToken) {
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            eprintln!("failed to listen for Ctrl+C: {e}");
            return;
        }
        info!("Ctrl+C received; cancelling run");
        token.cancel();
    });
}

async fn run_command(supervisor: &Supervisor, cfg: &ConfigFile, args: RunArgs) -> Result<i32> {
    let defaults = cfg.defaults.run_options();
    let options = RunOptions {
        collect: args.collect || defaults.collect,
        merge_stderr: args.merge_stderr || defaults.merge_stderr,
        skip_first_line: args.skip_first_line || defaults.skip_first_line,
        input: None,
    };
    let spec = CommandSpec::new(args.command);
    supervise(supervisor, &spec, &options).await
}

/// Process listing with the tool's header row dropped.
async fn list_processes(supervisor: &Supervisor) -> Result<i32> {
    let spec = if cfg!(windows) {
        CommandSpec::new(["tasklist.exe"])
    } else {
        CommandSpec::new(["ps", "-ef"])
    };
    let options = RunOptions {
        skip_first_line: true,
        ..RunOptions::streaming()
    };
    supervise(supervisor, &spec, &options).await
}

async fn supervise(supervisor: &Supervisor, spec: &CommandSpec, options: &RunOptions) -> Result<i32> {
    let cancel = CancellationToken::new();
    cancel_on_ctrl_c(cancel.clone());

    let sink: Arc<dyn LineSink> = Arc::new(ConsoleSink);
    let outcome = supervisor.run(spec, options, sink, &cancel).await;
    debug!(state = ?RunState::of(&outcome), "run finished");

    match outcome {
        Ok(result) => {
            for line in &result.lines {
                println!("{line}");
            }
            Ok(shell_exit_code(&result))
        }
        Err(err) => {
            if let Some(path) = termination_of(&err) {
                eprintln!("procrun: interrupted ({path})");
                return Ok(130);
            }
            let code = match &err {
                ExecutionError::InvalidCommand(_) => 2,
                ExecutionError::LaunchFailure { .. } => 127,
                _ => 1,
            };
            eprintln!("procrun: {err}");
            Ok(code)
        }
    }
}

/// Map a child's result to a shell-style exit code (128 + signal when killed).
pub fn shell_exit_code(result: &ExecutionResult) -> i32 {
    match result.signal {
        Some(sig) => 128 + sig,
        None => result.exit_code,
    }
}

fn print_info(env: &dyn Environment, keyboard: &dyn KeyboardLayout) {
    println!("os:          {}", env.os_name());
    println!("home:        {}", env.home_dir().display());
    println!("working dir: {}", env.working_dir().display());
    println!("user:        {}", env.username());
    println!("keyboard:    {}", keyboard.layout());
}

fn print_now(args: &NowArgs) -> Result<i32> {
    let clock = SystemClock;
    let text = match (&args.format, args.date) {
        (Some(pattern), _) => clock.format_now(pattern)?,
        (None, true) => clock.now(TimeDate::Date),
        (None, false) => clock.now(TimeDate::Time),
    };
    println!("{text}");
    Ok(0)
}

fn print_space(volumes: &dyn VolumeInfo, path: &Path) -> Result<i32> {
    let usage = volumes.space_usage(path)?;
    println!("name:      {}", volumes.display_name(path)?);
    println!("readable:  {}", volumes.is_readable(path));
    println!("writable:  {}", volumes.is_writable(path));
    println!("drive:     {}", volumes.is_drive(path)?);
    println!("removable: {}", volumes.is_removable_media(path)?);
    println!("total:     {}", usage.total);
    println!("free:      {}", usage.free);
    println!("used:      {}", usage.used());
    Ok(0)
}

async fn open_path(shell: DesktopShell, path: &Path, kind: EntryKind) -> Result<i32> {
    let outcome = shell.open(path, kind).await?;
    let code = match outcome {
        OpenOutcome::Opened => 0,
        OpenOutcome::NotFound => {
            eprintln!("procrun: {} does not exist", path.display());
            1
        }
        OpenOutcome::NotApplicableEntryType => {
            eprintln!("procrun: {} is not a {:?}", path.display(), kind);
            1
        }
        OpenOutcome::PlatformUnsupported => {
            eprintln!("procrun: desktop integration is not available here");
            2
        }
    };
    Ok(code)
}

async fn clip(clipboard: CommandClipboard, action: ClipAction) -> Result<i32> {
    match action {
        ClipAction::Copy { text } => clipboard.set_text(&text).await?,
        ClipAction::Paste => println!("{}", clipboard.get_text().await?),
    }
    Ok(0)
}
