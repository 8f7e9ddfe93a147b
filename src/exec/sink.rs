// src/exec/sink.rs

//! Destinations for lines forwarded in streaming mode.

use std::io::Write;

use super::drain::OutputLine;
use crate::types::StreamKind;

/// Receives each line as it arrives in streaming mode.
///
/// Called from the supervisor's line consumer task, one line at a time and in
/// arrival order. Implementations should not block for long: while a sink is
/// busy the drains back up behind the bounded line channel.
pub trait LineSink: Send + Sync {
    fn accept(&self, line: &OutputLine);
}

impl<F> LineSink for F
where
    F: Fn(&OutputLine) + Send + Sync,
{
    fn accept(&self, line: &OutputLine) {
        self(line)
    }
}

/// Prints stdout lines to our stdout and merged stderr lines to our stderr.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleSink;

impl LineSink for ConsoleSink {
    fn accept(&self, line: &OutputLine) {
        // A closed stdout (e.g. `procrun ps | head`) must not abort the run.
        let _ = match line.stream {
            StreamKind::Stdout => writeln!(std::io::stdout().lock(), "{}", line.text),
            StreamKind::Stderr => writeln!(std::io::stderr().lock(), "{}", line.text),
        };
    }
}

/// Discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl LineSink for NullSink {
    fn accept(&self, _line: &OutputLine) {}
}
