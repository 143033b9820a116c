// src/route/router.rs

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use tracing::warn;

use crate::record::{Channel, Level, Record};
use crate::signal::StatusSink;

/// What [`LogRouter::classify`] decided about a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// The record is execution bookkeeping; the caller must append it to
    /// [`crate::history::ExecutionHistory`]. Never "already final".
    History,
    /// Handled here: written to the persistent sink, dropped by the level
    /// threshold, or dispatched as a status transition.
    Routed,
}

/// Classifies each incoming record by channel and threshold, writing
/// qualifying records to the persistent sink.
///
/// The sink is guarded by a single mutex so interleaved producers never
/// interleave partial lines. Sink write failures are logged and swallowed:
/// a full disk must not take down the reader task.
pub struct LogRouter {
    threshold: Level,
    /// Mirror `HIST` records to the sink as an audit trail.
    mirror_history: bool,
    sink: Mutex<Box<dyn Write + Send>>,
    status_sink: Mutex<Option<Arc<dyn StatusSink>>>,
}

impl LogRouter {
    /// Router writing to an arbitrary sink (tests inject a buffer here).
    pub fn new(sink: Box<dyn Write + Send>, threshold: Level, mirror_history: bool) -> Self {
        Self {
            threshold,
            mirror_history,
            sink: Mutex::new(sink),
            status_sink: Mutex::new(None),
        }
    }

    /// Router writing to a flat text file, opened for the supervisor's
    /// lifetime in append or truncate mode.
    pub fn to_file(
        path: impl AsRef<Path>,
        append: bool,
        threshold: Level,
        mirror_history: bool,
    ) -> Result<Self> {
        let path = path.as_ref();
        let file = OpenOptions::new()
            .create(true)
            .append(append)
            .write(true)
            .truncate(!append)
            .open(path)
            .with_context(|| format!("opening persistent log file at {path:?}"))?;
        Ok(Self::new(Box::new(file), threshold, mirror_history))
    }

    /// Register the receiver of busy/paused transitions. Replaces any
    /// previously registered sink.
    pub fn set_status_sink(&self, sink: Arc<dyn StatusSink>) {
        *self.status_sink.lock().expect("status sink lock poisoned") = Some(sink);
    }

    /// Route one record.
    ///
    /// - `HIST`: optionally mirrored to the sink, always [`Disposition::History`].
    /// - `BUSY`/`PAUSE`: forwarded to the status sink (`status == "YES"` maps
    ///   to `true`), [`Disposition::Routed`].
    /// - plain: appended to the sink iff `level >= threshold`, flushed
    ///   immediately, [`Disposition::Routed`] either way.
    pub fn classify(&self, record: &Record) -> Disposition {
        match record.channel() {
            Channel::Hist => {
                if self.mirror_history {
                    self.write_line(record);
                }
                Disposition::History
            }
            Channel::Busy => {
                self.dispatch_status(record, |sink, on| sink.busy(on));
                Disposition::Routed
            }
            Channel::Pause => {
                self.dispatch_status(record, |sink, on| sink.paused(on));
                Disposition::Routed
            }
            Channel::Plain => {
                if record.level >= self.threshold {
                    self.write_line(record);
                }
                Disposition::Routed
            }
        }
    }

    fn dispatch_status(&self, record: &Record, forward: impl Fn(&dyn StatusSink, bool)) {
        let guard = self.status_sink.lock().expect("status sink lock poisoned");
        if let Some(sink) = guard.as_ref() {
            forward(sink.as_ref(), record.status == "YES");
        }
    }

    fn write_line(&self, record: &Record) {
        let line = format_line(record);
        let mut sink = self.sink.lock().expect("sink lock poisoned");
        if let Err(err) = writeln!(sink, "{line}").and_then(|()| sink.flush()) {
            warn!(error = %err, "failed to write persistent log line");
        }
    }
}

/// Deterministic one-line rendering of a record for the persistent sink.
///
/// The `[item/item_id]` segment is omitted for engine-global records, and
/// `when/status` is omitted when the record carries no channel tag (locally
/// built bookkeeping lines).
pub fn format_line(record: &Record) -> String {
    let mut line = format!(
        "{} {} {:<5} {}:{}",
        record.time, record.application, record.level, record.emitter, record.action
    );
    if let Some(item) = record.item.as_deref() {
        line.push_str(&format!(
            " [{}/{}]",
            item,
            record.item_id.as_deref().unwrap_or("")
        ));
    }
    if !record.when.is_empty() {
        line.push_str(&format!(" {}/{}", record.when, record.status));
    }
    line.push(' ');
    line.push_str(&record.message);
    line
}
