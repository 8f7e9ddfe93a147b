#![cfg(unix)]

mod common;
use crate::common::{TestResult, init_tracing};

use clap::Parser;

use procrun::cli::CliArgs;

async fn exit_code_of(argv: &[&str]) -> Result<i32, Box<dyn std::error::Error>> {
    let args = CliArgs::try_parse_from(argv)?;
    Ok(procrun::run(args).await?)
}

#[tokio::test]
async fn run_exits_with_the_child_code() -> TestResult {
    init_tracing();
    assert_eq!(exit_code_of(&["procrun", "run", "--", "sh", "-c", "exit 3"]).await?, 3);
    assert_eq!(exit_code_of(&["procrun", "run", "--collect", "--", "true"]).await?, 0);
    Ok(())
}

#[tokio::test]
async fn run_maps_launch_failure_to_127() -> TestResult {
    init_tracing();
    let code = exit_code_of(&["procrun", "run", "--", "/no/such/procrun-binary"]).await?;
    assert_eq!(code, 127);
    Ok(())
}

#[tokio::test]
async fn explicit_missing_config_is_an_error() {
    init_tracing();
    let res = exit_code_of(&[
        "procrun",
        "--config",
        "/no/such/procrun.toml",
        "run",
        "--",
        "true",
    ])
    .await;
    assert!(res.is_err());
}

#[tokio::test]
async fn now_rejects_unknown_specifiers() {
    init_tracing();
    assert!(exit_code_of(&["procrun", "now", "--format", "%Q"]).await.is_err());
    assert_eq!(exit_code_of(&["procrun", "now", "--date"]).await.ok(), Some(0));
}

#[tokio::test]
async fn space_reports_on_the_working_directory() -> TestResult {
    init_tracing();
    let dir = tempfile::tempdir()?;
    let path = dir.path().display().to_string();
    assert_eq!(exit_code_of(&["procrun", "space", &path]).await?, 0);
    Ok(())
}
