// src/history/store.rs

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

use tracing::{debug, warn};

use crate::history::message::parse_outcome;
use crate::record::Record;

/// Summary of one completed engine-tracked execution.
///
/// Immutable once created; evicted only by capacity pressure (oldest-first).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    /// End time of the execution, as sent by the engine.
    pub time: String,
    /// Item name (e.g. the task name).
    pub task: String,
    /// Opaque per-instance id of the item.
    pub task_id: String,
    /// Trigger name parsed from the terminal message; empty when the message
    /// did not match the expected pattern.
    pub trigger: String,
    /// End minus start time; zero when either timestamp was missing or
    /// unparseable.
    pub duration: Duration,
    /// Outcome token (`OK`, `FAIL`, `IND`, ...).
    pub success: String,
    /// Free-text remainder of the terminal message.
    pub message: String,
}

/// Bounded, time-ordered collection of completed-execution summaries.
///
/// Correlates asynchronous `HIST` START/terminal pairs keyed by
/// `"<item>/<item_id>"`. Internally synchronized: [`ExecutionHistory::append`]
/// runs on the reader task while [`ExecutionHistory::snapshot`] may be called
/// from any thread.
///
/// The open-execution table is transient by design: it is not persisted, so a
/// supervisor restart loses in-flight duration tracking (the engine itself is
/// being restarted in that case).
#[derive(Debug)]
pub struct ExecutionHistory {
    inner: Mutex<Inner>,
}

#[derive(Debug)]
struct Inner {
    capacity: usize,
    /// Pending START timestamps keyed by `"<item>/<item_id>"`.
    open: HashMap<String, String>,
    /// Completed entries, oldest first.
    entries: VecDeque<HistoryEntry>,
}

impl ExecutionHistory {
    /// Create a history holding at most `capacity` entries. A zero capacity
    /// is clamped to 1.
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Mutex::new(Inner {
                capacity: capacity.max(1),
                open: HashMap::new(),
                entries: VecDeque::new(),
            }),
        }
    }

    /// Feed one `HIST` record into the correlation step.
    ///
    /// START records open a pending execution (overwriting a stale open entry
    /// for the same key, if the engine reused an id). Terminal records close
    /// it and append a [`HistoryEntry`]. All degraded paths (missing START,
    /// unparseable timestamps, message not matching the outcome pattern) are
    /// recovered with a warning; nothing here ever takes down the reader.
    pub fn append(&self, record: &Record) {
        let key = format!(
            "{}/{}",
            record.item.as_deref().unwrap_or(""),
            record.item_id.as_deref().unwrap_or("")
        );

        let mut inner = self.inner.lock().expect("history lock poisoned");

        if record.status == "START" {
            if let Some(stale) = inner.open.insert(key.clone(), record.time.clone()) {
                warn!(
                    key = %key,
                    stale_start = %stale,
                    "duplicate START overwrote an open execution"
                );
            } else {
                debug!(key = %key, "opened execution");
            }
            return;
        }

        // Terminal record: close the pending execution.
        let duration = match inner.open.remove(&key) {
            Some(start) => duration_between(&start, &record.time).unwrap_or_else(|| {
                warn!(
                    key = %key,
                    start = %start,
                    end = %record.time,
                    "unparseable execution timestamps; recording zero duration"
                );
                Duration::ZERO
            }),
            None => {
                warn!(
                    key = %key,
                    status = %record.status,
                    "terminal history record without a matching START"
                );
                Duration::ZERO
            }
        };

        let (trigger, success, message) = match parse_outcome(&record.message) {
            Some(parsed) => (parsed.trigger, parsed.outcome, parsed.rest),
            None => {
                warn!(
                    key = %key,
                    message = %record.message,
                    "terminal message does not match the outcome pattern"
                );
                (String::new(), "IND".to_string(), record.message.clone())
            }
        };

        if inner.entries.len() >= inner.capacity {
            inner.entries.pop_front();
        }
        inner.entries.push_back(HistoryEntry {
            time: record.time.clone(),
            task: record.item.clone().unwrap_or_default(),
            task_id: record.item_id.clone().unwrap_or_default(),
            trigger,
            duration,
            success,
            message,
        });
    }

    /// Defensive copy of the current entries, oldest first.
    pub fn snapshot(&self) -> Vec<HistoryEntry> {
        let inner = self.inner.lock().expect("history lock poisoned");
        inner.entries.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().expect("history lock poisoned").entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Non-negative wall-clock difference between two wire timestamps.
fn duration_between(start: &str, end: &str) -> Option<Duration> {
    use chrono::NaiveDateTime;

    use crate::record::TIME_FORMAT;

    let start = NaiveDateTime::parse_from_str(start, TIME_FORMAT).ok()?;
    let end = NaiveDateTime::parse_from_str(end, TIME_FORMAT).ok()?;
    // A negative difference (engine clock weirdness) clamps to zero.
    Some((end - start).to_std().unwrap_or(Duration::ZERO))
}
