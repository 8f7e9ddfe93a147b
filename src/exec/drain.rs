// src/exec/drain.rs

//! Output drain: turn a child's byte stream into lines without ever letting
//! the pipe fill up.
//!
//! Each piped stream gets its own [`spawn_drain`] task. Drains push
//! [`OutputLine`]s into a bounded channel; a single [`spawn_consumer`] task on
//! the other end applies the mode rules (collect vs. forward, first-line
//! skip). A drain reads only: when it finishes it hands its reader back in the
//! [`DrainReport`] and the supervisor decides when to close it.

use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use super::sink::LineSink;
use crate::types::{StreamKind, TextEncoding};

/// One decoded line of child output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLine {
    pub stream: StreamKind,
    pub text: String,
}

/// What a drain task returns once its stream ends or it is cancelled.
#[derive(Debug)]
pub struct DrainReport<R> {
    pub reader: R,
    pub stream: StreamKind,
    pub lines: usize,
    /// Lines that contained bytes invalid under the configured encoding.
    pub replaced: usize,
    /// True if the drain stopped on cancellation rather than end-of-input.
    pub cancelled: bool,
}

/// Decode one raw line (without its terminator).
///
/// Returns the text and whether any replacement was needed.
pub fn decode_line(raw: &[u8], encoding: TextEncoding) -> (String, bool) {
    match encoding {
        TextEncoding::Utf8 => match std::str::from_utf8(raw) {
            Ok(s) => (s.to_string(), false),
            Err(_) => (String::from_utf8_lossy(raw).into_owned(), true),
        },
        TextEncoding::Latin1 => (raw.iter().map(|&b| char::from(b)).collect(), false),
    }
}

/// Strip one trailing `\n` and then one trailing `\r`.
fn strip_terminator(buf: &mut Vec<u8>) {
    if buf.last() == Some(&b'\n') {
        buf.pop();
        if buf.last() == Some(&b'\r') {
            buf.pop();
        }
    }
}

/// Read `reader` line by line until end-of-input or cancellation, sending
/// every line to `tx`.
pub async fn drain_lines<R>(
    reader: R,
    stream: StreamKind,
    encoding: TextEncoding,
    tx: mpsc::Sender<OutputLine>,
    cancel: CancellationToken,
) -> DrainReport<R>
where
    R: AsyncRead + Unpin,
{
    let mut reader = BufReader::new(reader);
    let mut buf = Vec::new();
    let mut lines = 0usize;
    let mut replaced = 0usize;
    let mut cancelled = false;

    loop {
        buf.clear();

        let read = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                cancelled = true;
                break;
            }
            res = reader.read_until(b'\n', &mut buf) => res,
        };

        match read {
            Ok(0) => break,
            Ok(_) => {}
            Err(e) => {
                warn!(?stream, error = %e, "read error on child output; ending drain");
                break;
            }
        }

        strip_terminator(&mut buf);
        let (text, lossy) = decode_line(&buf, encoding);
        if lossy {
            replaced += 1;
            warn!(
                ?stream,
                line = lines + 1,
                ?encoding,
                "undecodable bytes in child output; replaced"
            );
        }
        lines += 1;

        let line = OutputLine { stream, text };
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                cancelled = true;
                break;
            }
            sent = tx.send(line) => {
                if sent.is_err() {
                    debug!(?stream, "line consumer gone; ending drain");
                    break;
                }
            }
        }
    }

    debug!(?stream, lines, replaced, cancelled, "drain finished");

    DrainReport {
        reader: reader.into_inner(),
        stream,
        lines,
        replaced,
        cancelled,
    }
}

/// Spawn [`drain_lines`] on its own Tokio task.
pub fn spawn_drain<R>(
    reader: R,
    stream: StreamKind,
    encoding: TextEncoding,
    tx: mpsc::Sender<OutputLine>,
    cancel: CancellationToken,
) -> JoinHandle<DrainReport<R>>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(drain_lines(reader, stream, encoding, tx, cancel))
}

/// Mode rules applied by the line consumer.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsumeOptions {
    pub collect: bool,
    pub skip_first_line: bool,
}

/// What the line consumer saw.
#[derive(Debug, Default)]
pub struct Consumed {
    /// Retained lines (collecting mode only).
    pub lines: Vec<String>,
    /// Lines handed to the sink (streaming mode only).
    pub forwarded: usize,
    pub skipped: usize,
}

/// Receive lines until every drain has dropped its sender.
///
/// In collecting mode every line is retained in arrival order and nothing is
/// skipped. In streaming mode lines go to `sink`, optionally minus the first.
///
/// Sinks are synchronous and may block (a full stdout pipe), so this runs on
/// the blocking pool: see [`spawn_consumer`]. Must not be called from async
/// context.
pub fn consume_lines(
    mut rx: mpsc::Receiver<OutputLine>,
    options: ConsumeOptions,
    sink: Arc<dyn LineSink>,
) -> Consumed {
    let mut out = Consumed::default();
    let mut first = true;

    while let Some(line) = rx.blocking_recv() {
        if options.collect {
            out.lines.push(line.text);
            continue;
        }

        if first && options.skip_first_line {
            first = false;
            out.skipped += 1;
            debug!(text = %line.text, "skipping first output line");
            continue;
        }
        first = false;

        sink.accept(&line);
        out.forwarded += 1;
    }

    out
}

/// Run [`consume_lines`] on a blocking-pool thread.
pub fn spawn_consumer(
    rx: mpsc::Receiver<OutputLine>,
    options: ConsumeOptions,
    sink: Arc<dyn LineSink>,
) -> JoinHandle<Consumed> {
    tokio::task::spawn_blocking(move || consume_lines(rx, options, sink))
}
