// src/host/desktop.rs

//! Opening files and folders in the desktop shell.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::errors::HostError;
use crate::exec::{CommandSpec, Launcher, ProcessLauncher, Supervisor};

/// What the caller expects the path to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Folder,
    File,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenOutcome {
    Opened,
    NotFound,
    /// The path exists but is not the requested kind.
    NotApplicableEntryType,
    /// No desktop integration on this platform/session.
    PlatformUnsupported,
}

/// Hands paths to the platform opener (`xdg-open`, `open`, `explorer`).
#[derive(Debug, Clone)]
pub struct DesktopShell<L: Launcher = ProcessLauncher> {
    supervisor: Supervisor<L>,
    opener: Option<PathBuf>,
}

impl<L: Launcher> DesktopShell<L> {
    /// Locate the platform opener; `None` when there is no desktop session.
    pub fn detect(supervisor: Supervisor<L>) -> Self {
        let opener = detect_opener();
        debug!(?opener, "desktop opener");
        Self { supervisor, opener }
    }

    pub fn with_opener(supervisor: Supervisor<L>, opener: Option<PathBuf>) -> Self {
        Self { supervisor, opener }
    }

    pub fn is_supported(&self) -> bool {
        self.opener.is_some()
    }

    pub async fn open(&self, path: &Path, kind: EntryKind) -> Result<OpenOutcome, HostError> {
        let Some(opener) = &self.opener else {
            return Ok(OpenOutcome::PlatformUnsupported);
        };

        let meta = match std::fs::metadata(path) {
            Ok(meta) => meta,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(OpenOutcome::NotFound),
            Err(source) => {
                return Err(HostError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        let matches = match kind {
            EntryKind::Folder => meta.is_dir(),
            EntryKind::File => meta.is_file(),
        };
        if !matches {
            return Ok(OpenOutcome::NotApplicableEntryType);
        }

        let spec = CommandSpec::new([
            opener.to_string_lossy().into_owned(),
            path.to_string_lossy().into_owned(),
        ]);
        let result = self.supervisor.output(&spec).await?;

        // explorer.exe reports 1 even when it opened the window.
        if !result.success() && !cfg!(windows) {
            return Err(HostError::PlatformUnavailable(format!(
                "{} exited with code {}",
                opener.display(),
                result.exit_code
            )));
        }

        info!(path = %path.display(), ?kind, "opened in desktop shell");
        Ok(OpenOutcome::Opened)
    }
}

fn detect_opener() -> Option<PathBuf> {
    if cfg!(windows) {
        return which::which("explorer").ok();
    }
    if cfg!(target_os = "macos") {
        return which::which("open").ok();
    }
    if !has_graphical_session() {
        return None;
    }
    which::which("xdg-open").ok()
}

pub(crate) fn has_graphical_session() -> bool {
    ["DISPLAY", "WAYLAND_DISPLAY"]
        .iter()
        .any(|key| std::env::var_os(key).is_some_and(|v| !v.is_empty()))
}
