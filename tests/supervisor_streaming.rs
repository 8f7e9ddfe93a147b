#![cfg(unix)]

mod common;
use crate::common::{
    CountingSink, OptionsBuilder, RecordingSink, TestResult, init_tracing, run_with, sh,
    with_timeout,
};

use std::sync::Arc;

use procrun::exec::DrainStatus;
use procrun::types::StreamKind;

#[tokio::test]
async fn eight_megabytes_of_stdout_stream_without_stalling() -> TestResult {
    init_tracing();

    // 27-byte lines; 8 MiB leaves a 5-byte unterminated tail.
    let spec = sh("yes abcdefghijklmnopqrstuvwxyz | head -c 8388608");
    let sink = CountingSink::default();

    let result = with_timeout(run_with(
        &spec,
        &OptionsBuilder::streaming().build(),
        Arc::new(sink.clone()),
    ))
    .await?;

    assert_eq!(result.exit_code, 0);
    assert_eq!(result.drain, DrainStatus::Complete);
    assert_eq!(sink.lines(), 310_690);
    assert_eq!(result.forwarded, 310_690);
    assert_eq!(sink.bytes(), 310_689 * 26 + 5);
    assert!(result.lines.is_empty(), "streaming mode retains nothing");
    Ok(())
}

#[tokio::test]
async fn large_merged_stderr_does_not_block_the_child() -> TestResult {
    init_tracing();

    let spec = sh("yes err | head -c 1048576 >&2; echo done");
    let sink = RecordingSink::new();

    let result = with_timeout(run_with(
        &spec,
        &OptionsBuilder::streaming().merge_stderr().build(),
        Arc::new(sink.clone()),
    ))
    .await?;

    assert_eq!(result.exit_code, 0);
    assert_eq!(sink.texts_from(StreamKind::Stderr).len(), 262_144);
    assert_eq!(sink.texts_from(StreamKind::Stdout), vec!["done"]);
    Ok(())
}

#[tokio::test]
async fn skip_first_line_drops_only_the_header() -> TestResult {
    init_tracing();

    let spec = sh("printf 'A\\nB\\nC\\n'");

    let skipped = RecordingSink::new();
    let result = run_with(
        &spec,
        &OptionsBuilder::streaming().skip_first_line(true).build(),
        Arc::new(skipped.clone()),
    )
    .await?;
    assert_eq!(skipped.texts(), vec!["B", "C"]);
    assert_eq!(result.forwarded, 2);

    let all = RecordingSink::new();
    run_with(
        &spec,
        &OptionsBuilder::streaming().skip_first_line(false).build(),
        Arc::new(all.clone()),
    )
    .await?;
    assert_eq!(all.texts(), vec!["A", "B", "C"]);
    Ok(())
}

#[tokio::test]
async fn skip_first_line_on_silent_child_is_harmless() -> TestResult {
    init_tracing();

    let sink = RecordingSink::new();
    let result = run_with(
        &sh("true"),
        &OptionsBuilder::streaming().skip_first_line(true).build(),
        Arc::new(sink.clone()),
    )
    .await?;

    assert!(result.success());
    assert!(sink.is_empty());
    assert_eq!(result.forwarded, 0);
    Ok(())
}

#[tokio::test]
async fn collecting_mode_ignores_skip_first_line_and_the_sink() -> TestResult {
    init_tracing();

    let sink = RecordingSink::new();
    let result = run_with(
        &sh("printf 'A\\nB\\nC\\n'"),
        &OptionsBuilder::collecting().skip_first_line(true).build(),
        Arc::new(sink.clone()),
    )
    .await?;

    assert_eq!(result.lines, vec!["A", "B", "C"]);
    assert!(sink.is_empty());
    Ok(())
}
