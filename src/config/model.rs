// src/config/model.rs

use serde::Deserialize;

use crate::exec::{RunOptions, SupervisorConfig};
use crate::types::TextEncoding;

/// Top-level configuration as read from a TOML file.
///
/// ```toml
/// [supervisor]
/// encoding = "utf-8"
/// grace_period = "3s"
/// drain_timeout = "2s"
/// channel_capacity = 256
///
/// [defaults]
/// collect = false
/// merge_stderr = false
/// skip_first_line = false
/// ```
///
/// All sections are optional and have reasonable defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawConfigFile {
    #[serde(default)]
    pub supervisor: SupervisorSection,

    #[serde(default)]
    pub defaults: DefaultsSection,
}

/// `[supervisor]` section, durations still unparsed.
#[derive(Debug, Clone, Deserialize)]
pub struct SupervisorSection {
    /// `"utf-8"` (default) or `"latin1"`.
    #[serde(default)]
    pub encoding: TextEncoding,

    /// How long a cancelled child gets between SIGTERM and SIGKILL.
    #[serde(default = "default_grace_period")]
    pub grace_period: String,

    /// How long to wait for output drains after the child has exited.
    #[serde(default = "default_drain_timeout")]
    pub drain_timeout: String,

    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,
}

fn default_grace_period() -> String {
    "3s".to_string()
}

fn default_drain_timeout() -> String {
    "2s".to_string()
}

fn default_channel_capacity() -> usize {
    256
}

impl Default for SupervisorSection {
    fn default() -> Self {
        Self {
            encoding: TextEncoding::default(),
            grace_period: default_grace_period(),
            drain_timeout: default_drain_timeout(),
            channel_capacity: default_channel_capacity(),
        }
    }
}

/// `[defaults]` section: run options used when the CLI does not override them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct DefaultsSection {
    #[serde(default)]
    pub collect: bool,
    #[serde(default)]
    pub merge_stderr: bool,
    #[serde(default)]
    pub skip_first_line: bool,
}

impl DefaultsSection {
    pub fn run_options(&self) -> RunOptions {
        RunOptions {
            collect: self.collect,
            merge_stderr: self.merge_stderr,
            skip_first_line: self.skip_first_line,
            input: None,
        }
    }
}

/// Validated configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigFile {
    pub supervisor: SupervisorConfig,
    pub defaults: DefaultsSection,
}

impl ConfigFile {
    /// Construct without validation. Prefer `ConfigFile::try_from(raw)`.
    pub(crate) fn new_unchecked(supervisor: SupervisorConfig, defaults: DefaultsSection) -> Self {
        Self {
            supervisor,
            defaults,
        }
    }
}
