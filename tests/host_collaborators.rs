#![cfg(unix)]

mod common;
use crate::common::{TestResult, fast_config, init_tracing, sh};

use std::path::PathBuf;

use procrun::errors::HostError;
use procrun::exec::{CommandSpec, Supervisor};
use procrun::host::{
    ClipboardTools, CommandClipboard, DesktopShell, EntryKind, OpenOutcome, SystemVolumes,
    VolumeInfo,
};

fn file_backed_clipboard(store: &std::path::Path) -> CommandClipboard {
    let tools = ClipboardTools {
        copy: sh(&format!("cat > '{}'", store.display())),
        paste: CommandSpec::new(["cat".to_string(), store.display().to_string()]),
    };
    CommandClipboard::with_tools(Supervisor::new(fast_config()), tools)
}

#[tokio::test]
async fn clipboard_text_survives_copy_then_paste() -> TestResult {
    init_tracing();
    let dir = tempfile::tempdir()?;
    let clipboard = file_backed_clipboard(&dir.path().join("clip"));

    clipboard.set_text("hello\nworld").await?;
    assert_eq!(clipboard.get_text().await?, "hello\nworld");

    clipboard.set_text("").await?;
    assert_eq!(clipboard.get_text().await?, "");
    Ok(())
}

#[tokio::test]
async fn paste_without_text_content_is_empty() -> TestResult {
    init_tracing();
    let clipboard = CommandClipboard::with_tools(
        Supervisor::new(fast_config()),
        ClipboardTools {
            copy: CommandSpec::new(["true"]),
            paste: sh("echo 'No selection' >&2; exit 1"),
        },
    );

    assert_eq!(clipboard.get_text().await?, "");
    Ok(())
}

#[tokio::test]
async fn failing_copy_tool_is_reported() {
    init_tracing();
    let clipboard = CommandClipboard::with_tools(
        Supervisor::new(fast_config()),
        ClipboardTools {
            copy: sh("cat > /dev/null; exit 3"),
            paste: CommandSpec::new(["true"]),
        },
    );

    let err = clipboard.set_text("x").await.unwrap_err();
    assert!(matches!(err, HostError::PlatformUnavailable(_)), "{err}");
}

#[tokio::test]
async fn open_checks_existence_and_kind_before_launching() -> TestResult {
    init_tracing();
    let dir = tempfile::tempdir()?;
    let file = dir.path().join("note.txt");
    std::fs::write(&file, "hi")?;

    let shell = DesktopShell::with_opener(Supervisor::new(fast_config()), Some(PathBuf::from("true")));
    assert!(shell.is_supported());

    assert_eq!(shell.open(dir.path(), EntryKind::Folder).await?, OpenOutcome::Opened);
    assert_eq!(shell.open(&file, EntryKind::File).await?, OpenOutcome::Opened);
    assert_eq!(
        shell.open(&file, EntryKind::Folder).await?,
        OpenOutcome::NotApplicableEntryType
    );
    assert_eq!(
        shell.open(dir.path(), EntryKind::File).await?,
        OpenOutcome::NotApplicableEntryType
    );
    assert_eq!(
        shell.open(&dir.path().join("missing"), EntryKind::File).await?,
        OpenOutcome::NotFound
    );
    Ok(())
}

#[tokio::test]
async fn open_without_desktop_is_unsupported() -> TestResult {
    init_tracing();
    let shell = DesktopShell::with_opener(Supervisor::new(fast_config()), None);
    assert!(!shell.is_supported());
    assert_eq!(
        shell.open(std::path::Path::new("/"), EntryKind::Folder).await?,
        OpenOutcome::PlatformUnsupported
    );
    Ok(())
}

#[tokio::test]
async fn failing_opener_is_an_error() -> TestResult {
    init_tracing();
    let dir = tempfile::tempdir()?;
    let shell = DesktopShell::with_opener(Supervisor::new(fast_config()), Some(PathBuf::from("false")));

    let res = shell.open(dir.path(), EntryKind::Folder).await;
    assert!(matches!(res, Err(HostError::PlatformUnavailable(_))));
    Ok(())
}

#[test]
fn volume_snapshot_of_a_temp_dir() -> TestResult {
    let dir = tempfile::tempdir()?;
    let volumes = SystemVolumes;

    let usage = volumes.space_usage(dir.path())?;
    assert!(usage.total > 0);
    assert!(usage.free <= usage.total);
    assert_eq!(usage.used(), usage.total - usage.free);
    assert_eq!(volumes.total_capacity(dir.path())?, usage.total);

    assert!(volumes.is_readable(dir.path()));
    assert!(volumes.is_writable(dir.path()));
    assert!(!volumes.display_name(dir.path())?.is_empty());
    Ok(())
}

#[test]
fn capacity_queries_agree_and_are_stable() -> TestResult {
    let dir = tempfile::tempdir()?;
    let volumes = SystemVolumes;
    let path = dir.path();

    let total = volumes.total_capacity(path)?;
    assert_eq!(volumes.total_capacity(path)?, total);

    // Other processes may write to the same filesystem between calls, so
    // accept the first round in which free space did not move.
    let mut agreed = false;
    for _ in 0..5 {
        let free = volumes.free_space(path)?;
        let used = volumes.used_space(path)?;
        if volumes.free_space(path)? == free {
            assert_eq!(used, total - free);
            agreed = true;
            break;
        }
    }
    assert!(agreed, "free space never settled");
    Ok(())
}

#[test]
fn temp_dir_is_not_a_drive_but_root_is() -> TestResult {
    let dir = tempfile::tempdir()?;
    assert!(!SystemVolumes.is_drive(dir.path())?);
    assert!(SystemVolumes.is_drive(std::path::Path::new("/"))?);
    Ok(())
}

#[test]
fn volume_queries_on_missing_path_fail() {
    let volumes = SystemVolumes;
    let missing = std::path::Path::new("/definitely/not/here/procrun");

    assert!(matches!(volumes.space_usage(missing), Err(HostError::Io { .. })));
    assert!(!volumes.is_readable(missing));
    assert!(!volumes.is_writable(missing));
}
