// tests/config_loading.rs

use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use tempfile::NamedTempFile;

use procrun::config::{ConfigFile, load_and_validate, load_or_default};
use procrun::errors::ProcrunError;
use procrun::exec::{MAX_CHANNEL_CAPACITY, SupervisorConfig};
use procrun::types::TextEncoding;

type TestResult = Result<(), Box<dyn std::error::Error>>;

fn write_config(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{contents}").unwrap();
    file
}

#[test]
fn empty_file_yields_defaults() -> TestResult {
    let file = write_config("");
    let cfg = load_and_validate(file.path())?;
    assert_eq!(cfg, ConfigFile::default());
    assert_eq!(cfg.supervisor, SupervisorConfig::default());
    Ok(())
}

#[test]
fn all_fields_are_read() -> TestResult {
    let file = write_config(
        r#"
[supervisor]
encoding = "latin1"
grace_period = "250ms"
drain_timeout = "1m"
channel_capacity = 8

[defaults]
collect = true
skip_first_line = true
"#,
    );

    let cfg = load_and_validate(file.path())?;
    assert_eq!(cfg.supervisor.encoding, TextEncoding::Latin1);
    assert_eq!(cfg.supervisor.grace_period, Duration::from_millis(250));
    assert_eq!(cfg.supervisor.drain_timeout, Duration::from_secs(60));
    assert_eq!(cfg.supervisor.channel_capacity, 8);

    let options = cfg.defaults.run_options();
    assert!(options.collect);
    assert!(!options.merge_stderr);
    assert!(options.skip_first_line);
    assert!(options.input.is_none());
    Ok(())
}

#[test]
fn zero_channel_capacity_is_rejected() {
    let file = write_config("[supervisor]\nchannel_capacity = 0\n");
    match load_and_validate(file.path()) {
        Err(ProcrunError::ConfigError(msg)) => assert!(msg.contains("channel_capacity")),
        other => panic!("expected ConfigError, got {other:?}"),
    }
}

#[test]
fn oversized_channel_capacity_is_rejected() {
    let file = write_config("[supervisor]\nchannel_capacity = 9223372036854775807\n");
    match load_and_validate(file.path()) {
        Err(ProcrunError::ConfigError(msg)) => assert!(msg.contains("channel_capacity"), "{msg}"),
        other => panic!("expected ConfigError, got {other:?}"),
    }

    let file = write_config(&format!("[supervisor]\nchannel_capacity = {MAX_CHANNEL_CAPACITY}\n"));
    assert!(load_and_validate(file.path()).is_ok());
}

#[test]
fn bad_durations_are_rejected() {
    for (field, value) in [
        ("grace_period", "soon"),
        ("drain_timeout", "0s"),
        ("grace_period", "5"),
        ("drain_timeout", "9999999999999999999h"),
    ] {
        let file = write_config(&format!("[supervisor]\n{field} = \"{value}\"\n"));
        match load_and_validate(file.path()) {
            Err(ProcrunError::ConfigError(msg)) => assert!(msg.contains(field), "{msg}"),
            other => panic!("expected ConfigError for {field}={value}, got {other:?}"),
        }
    }
}

#[test]
fn unknown_encoding_is_a_toml_error() {
    let file = write_config("[supervisor]\nencoding = \"ebcdic\"\n");
    assert!(matches!(
        load_and_validate(file.path()),
        Err(ProcrunError::TomlError(_))
    ));
}

#[test]
fn missing_implicit_file_falls_back_to_defaults() -> TestResult {
    let dir = tempfile::tempdir()?;
    let cfg = load_or_default(dir.path().join("procrun.toml"), false)?;
    assert_eq!(cfg, ConfigFile::default());
    Ok(())
}

#[test]
fn missing_explicit_file_is_an_error() -> TestResult {
    let dir = tempfile::tempdir()?;
    let res = load_or_default(dir.path().join("nope.toml"), true);
    assert!(matches!(res, Err(ProcrunError::IoError(_))));
    Ok(())
}

#[test]
fn demo_config_is_valid() -> TestResult {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("demos/procrun.toml");
    let cfg = load_and_validate(&path)?;
    assert_eq!(cfg.supervisor, SupervisorConfig::default());
    assert_eq!(cfg.defaults.run_options(), procrun::exec::RunOptions::streaming());
    Ok(())
}
