// src/logging.rs

//! Logging setup for `procrun` using `tracing` + `tracing-subscriber`.
//!
//! The filter is chosen in this order:
//! 1. `--log-level` CLI flag, applied to every target;
//! 2. `PROCRUN_LOG`, in full `EnvFilter` syntax (`debug`,
//!    `procrun::exec=trace,warn`, ...);
//! 3. `warn`.
//!
//! Events go to stderr. Stdout carries only the child's output, so
//! `procrun run -- cmd | grep x` sees what `cmd | grep x` would.

use anyhow::{Result, anyhow};
use tracing_subscriber::{EnvFilter, fmt};

use crate::cli::LogLevel;

/// Environment variable holding the filter directives.
pub const LOG_ENV: &str = "PROCRUN_LOG";

const DEFAULT_DIRECTIVE: &str = "warn";

/// Install the global subscriber. Fails if one is already installed.
pub fn init_logging(cli_level: Option<LogLevel>) -> Result<()> {
    let env = std::env::var(LOG_ENV).ok();
    let filter = build_filter(cli_level, env.as_deref());

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow!("initialising logging: {e}"))
}

fn build_filter(cli_level: Option<LogLevel>, env: Option<&str>) -> EnvFilter {
    if let Some(level) = cli_level {
        return EnvFilter::new(directive(level));
    }

    match env.map(str::trim).filter(|s| !s.is_empty()) {
        Some(spec) => EnvFilter::try_new(spec).unwrap_or_else(|e| {
            // No subscriber yet, so this cannot go through tracing.
            eprintln!("procrun: ignoring invalid {LOG_ENV}={spec:?}: {e}");
            EnvFilter::new(DEFAULT_DIRECTIVE)
        }),
        None => EnvFilter::new(DEFAULT_DIRECTIVE),
    }
}

fn directive(level: LogLevel) -> &'static str {
    match level {
        LogLevel::Error => "error",
        LogLevel::Warn => "warn",
        LogLevel::Info => "info",
        LogLevel::Debug => "debug",
        LogLevel::Trace => "trace",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_level_wins_over_environment() {
        let filter = build_filter(Some(LogLevel::Debug), Some("procrun=trace"));
        assert_eq!(filter.to_string(), "debug");
    }

    #[test]
    fn environment_accepts_per_target_directives() {
        let filter = build_filter(None, Some(" procrun::exec=debug "));
        assert_eq!(filter.to_string(), "procrun::exec=debug");
    }

    #[test]
    fn missing_blank_or_invalid_environment_falls_back_to_warn() {
        assert_eq!(build_filter(None, None).to_string(), "warn");
        assert_eq!(build_filter(None, Some("  ")).to_string(), "warn");
        assert_eq!(build_filter(None, Some("procrun=loud")).to_string(), "warn");
    }
}
