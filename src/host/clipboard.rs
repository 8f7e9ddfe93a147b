// src/host/clipboard.rs

//! System clipboard access through the platform's clipboard tools.
//!
//! Copying feeds the text to the tool's stdin; pasting collects its stdout.
//! Both go through the same [`Supervisor`] as any other command.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::errors::HostError;
use crate::exec::{CommandSpec, Launcher, LineSink, NullSink, ProcessLauncher, RunOptions, Supervisor};

/// The pair of commands used to write and read the clipboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClipboardTools {
    /// Reads the new clipboard text from stdin.
    pub copy: CommandSpec,
    /// Writes the clipboard text to stdout.
    pub paste: CommandSpec,
}

#[derive(Debug, Clone)]
pub struct CommandClipboard<L: Launcher = ProcessLauncher> {
    supervisor: Supervisor<L>,
    tools: Option<ClipboardTools>,
}

impl<L: Launcher> CommandClipboard<L> {
    /// Pick tools for the current session, if any are installed.
    pub fn detect(supervisor: Supervisor<L>) -> Self {
        let tools = detect_tools();
        debug!(?tools, "clipboard tools");
        Self { supervisor, tools }
    }

    pub fn with_tools(supervisor: Supervisor<L>, tools: ClipboardTools) -> Self {
        Self {
            supervisor,
            tools: Some(tools),
        }
    }

    fn tools(&self) -> Result<&ClipboardTools, HostError> {
        self.tools.as_ref().ok_or_else(|| {
            HostError::PlatformUnavailable(
                "no clipboard tool found (headless session or none installed)".to_string(),
            )
        })
    }

    pub async fn set_text(&self, text: &str) -> Result<(), HostError> {
        let tools = self.tools()?;
        let options = RunOptions {
            collect: true,
            input: Some(text.as_bytes().to_vec()),
            ..RunOptions::default()
        };
        let sink: Arc<dyn LineSink> = Arc::new(NullSink);
        let result = self
            .supervisor
            .run(&tools.copy, &options, sink, &CancellationToken::new())
            .await?;

        if !result.success() {
            return Err(HostError::PlatformUnavailable(format!(
                "'{}' exited with code {}",
                tools.copy, result.exit_code
            )));
        }
        Ok(())
    }

    /// Current clipboard text; empty when the clipboard holds no text.
    ///
    /// Lines are re-joined with `\n`, so a trailing newline is not preserved.
    pub async fn get_text(&self) -> Result<String, HostError> {
        let tools = self.tools()?;
        let result = self.supervisor.output(&tools.paste).await?;

        if !result.success() {
            // wl-paste and friends exit non-zero when there is no text content.
            debug!(exit_code = result.exit_code, "paste tool reported no text");
            return Ok(String::new());
        }
        Ok(result.lines.join("\n"))
    }
}

fn detect_tools() -> Option<ClipboardTools> {
    let have = |tool: &str| which::which(tool).is_ok();

    if cfg!(windows) {
        return have("clip").then(|| ClipboardTools {
            copy: CommandSpec::new(["clip"]),
            paste: CommandSpec::new(["powershell", "-NoProfile", "-Command", "Get-Clipboard"]),
        });
    }

    if cfg!(target_os = "macos") {
        return (have("pbcopy") && have("pbpaste")).then(|| ClipboardTools {
            copy: CommandSpec::new(["pbcopy"]),
            paste: CommandSpec::new(["pbpaste"]),
        });
    }

    if std::env::var_os("WAYLAND_DISPLAY").is_some() && have("wl-copy") && have("wl-paste") {
        return Some(ClipboardTools {
            copy: CommandSpec::new(["wl-copy"]),
            paste: CommandSpec::new(["wl-paste", "--no-newline"]),
        });
    }

    if !super::desktop::has_graphical_session() {
        return None;
    }

    if have("xclip") {
        return Some(ClipboardTools {
            copy: CommandSpec::new(["xclip", "-selection", "clipboard"]),
            paste: CommandSpec::new(["xclip", "-selection", "clipboard", "-o"]),
        });
    }

    if have("xsel") {
        return Some(ClipboardTools {
            copy: CommandSpec::new(["xsel", "--clipboard", "--input"]),
            paste: CommandSpec::new(["xsel", "--clipboard", "--output"]),
        });
    }

    None
}
