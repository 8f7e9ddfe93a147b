use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use procrun::errors::ExecutionError;
use procrun::exec::{
    CommandSpec, LaunchOptions, Launcher, LineSink, OutputLine, ProcessLauncher, RunningProcess,
};
use procrun::types::StreamKind;

/// A sink that records every line it is handed, in order.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    lines: Arc<Mutex<Vec<OutputLine>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn texts(&self) -> Vec<String> {
        self.lines
            .lock()
            .unwrap()
            .iter()
            .map(|l| l.text.clone())
            .collect()
    }

    pub fn texts_from(&self, stream: StreamKind) -> Vec<String> {
        self.lines
            .lock()
            .unwrap()
            .iter()
            .filter(|l| l.stream == stream)
            .map(|l| l.text.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.lines.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl LineSink for RecordingSink {
    fn accept(&self, line: &OutputLine) {
        self.lines.lock().unwrap().push(line.clone());
    }
}

/// A sink that only counts lines and bytes (for very large outputs).
#[derive(Debug, Clone, Default)]
pub struct CountingSink {
    lines: Arc<AtomicUsize>,
    bytes: Arc<AtomicUsize>,
}

impl CountingSink {
    pub fn lines(&self) -> usize {
        self.lines.load(Ordering::SeqCst)
    }

    pub fn bytes(&self) -> usize {
        self.bytes.load(Ordering::SeqCst)
    }
}

impl LineSink for CountingSink {
    fn accept(&self, line: &OutputLine) {
        self.lines.fetch_add(1, Ordering::SeqCst);
        self.bytes.fetch_add(line.text.len(), Ordering::SeqCst);
    }
}

/// Wraps the real launcher and counts how many times a spawn was attempted.
#[derive(Debug, Clone, Default)]
pub struct CountingLauncher {
    inner: ProcessLauncher,
    spawns: Arc<AtomicUsize>,
}

impl CountingLauncher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shared counter, readable after the launcher has been moved into a
    /// supervisor.
    pub fn counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.spawns)
    }
}

impl Launcher for CountingLauncher {
    fn launch(
        &self,
        spec: &CommandSpec,
        options: &LaunchOptions,
    ) -> Result<RunningProcess, ExecutionError> {
        self.spawns.fetch_add(1, Ordering::SeqCst);
        self.inner.launch(spec, options)
    }
}
