use std::time::Duration;

use procrun::exec::{RunOptions, SupervisorConfig};
use procrun::types::TextEncoding;

/// Builder for `RunOptions` to keep test setup readable.
#[derive(Debug, Default)]
pub struct OptionsBuilder {
    options: RunOptions,
}

impl OptionsBuilder {
    pub fn streaming() -> Self {
        Self {
            options: RunOptions::streaming(),
        }
    }

    pub fn collecting() -> Self {
        Self {
            options: RunOptions::collecting(),
        }
    }

    pub fn merge_stderr(mut self) -> Self {
        self.options.merge_stderr = true;
        self
    }

    pub fn skip_first_line(mut self, val: bool) -> Self {
        self.options.skip_first_line = val;
        self
    }

    pub fn input(mut self, bytes: impl Into<Vec<u8>>) -> Self {
        self.options.input = Some(bytes.into());
        self
    }

    pub fn build(self) -> RunOptions {
        self.options
    }
}

/// A supervisor config with short timeouts so cancellation tests finish fast.
pub fn fast_config() -> SupervisorConfig {
    SupervisorConfig {
        encoding: TextEncoding::Utf8,
        grace_period: Duration::from_millis(500),
        drain_timeout: Duration::from_millis(500),
        channel_capacity: 64,
    }
}
