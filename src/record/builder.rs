// src/record/builder.rs

use anyhow::{Result, anyhow};
use chrono::Local;

use crate::record::model::{Level, PRODUCER_NAME, Record};

/// Like [`crate::record::TIME_FORMAT`], but with the fraction pinned to
/// exactly six digits for emission.
const EMIT_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

/// Fluent builder for locally-produced records.
///
/// The engine is the real record source; this exists for the supervisor's own
/// bookkeeping lines (start/stop annotations), which are pushed through the
/// router exactly like decoded engine output.
///
/// `message`, `emitter` and `action` are required; [`RecordBuilder::build`]
/// fails fast when any is missing. `time` defaults to now with microsecond
/// precision, `level` to `INFO`, and `application` to [`PRODUCER_NAME`].
#[derive(Debug, Default)]
pub struct RecordBuilder {
    time: Option<String>,
    level: Option<Level>,
    emitter: Option<String>,
    action: Option<String>,
    item: Option<String>,
    item_id: Option<String>,
    when: Option<String>,
    status: Option<String>,
    message: Option<String>,
}

impl RecordBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the timestamp (ISO-8601 with microseconds). Mostly useful
    /// for tests; defaults to the current local time.
    pub fn time(mut self, time: impl Into<String>) -> Self {
        self.time = Some(time.into());
        self
    }

    pub fn level(mut self, level: Level) -> Self {
        self.level = Some(level);
        self
    }

    pub fn emitter(mut self, emitter: impl Into<String>) -> Self {
        self.emitter = Some(emitter.into());
        self
    }

    pub fn action(mut self, action: impl Into<String>) -> Self {
        self.action = Some(action.into());
        self
    }

    pub fn item(mut self, item: impl Into<String>) -> Self {
        self.item = Some(item.into());
        self
    }

    pub fn item_id(mut self, item_id: impl Into<String>) -> Self {
        self.item_id = Some(item_id.into());
        self
    }

    pub fn when(mut self, when: impl Into<String>) -> Self {
        self.when = Some(when.into());
        self
    }

    pub fn status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Assemble the record, failing when a required field was never set.
    pub fn build(self) -> Result<Record> {
        let message = self
            .message
            .ok_or_else(|| anyhow!("record builder requires a message"))?;
        let emitter = self
            .emitter
            .ok_or_else(|| anyhow!("record builder requires an emitter"))?;
        let action = self
            .action
            .ok_or_else(|| anyhow!("record builder requires an action"))?;

        Ok(Record {
            time: self
                .time
                .unwrap_or_else(|| Local::now().format(EMIT_TIME_FORMAT).to_string()),
            application: PRODUCER_NAME.to_string(),
            level: self.level.unwrap_or(Level::Info),
            emitter,
            action,
            item: self.item,
            item_id: self.item_id,
            when: self.when.unwrap_or_default(),
            status: self.status.unwrap_or_default(),
            message,
        })
    }
}
