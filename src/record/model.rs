// src/record/model.rs

use std::fmt;
use std::str::FromStr;

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer};

/// Producer identifier stamped on records built locally (as opposed to
/// records decoded from the engine, which carry the engine's own name).
pub const PRODUCER_NAME: &str = "stoker";

/// Timestamp format used on the wire: ISO-8601 with microsecond precision,
/// e.g. `2026-08-23T10:00:00.123456`.
pub const TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// Severity of a record.
///
/// The ordering is total (`TRACE < DEBUG < INFO < WARN < ERROR`) and is what
/// the router's threshold filter compares against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Level {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl Level {
    /// The uppercase wire form, also used when formatting sink lines.
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Trace => "TRACE",
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Warn => "WARN",
            Level::Error => "ERROR",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // `pad` keeps width specifiers working in sink-line formatting.
        f.pad(self.as_str())
    }
}

impl FromStr for Level {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "trace" => Ok(Level::Trace),
            "debug" => Ok(Level::Debug),
            "info" => Ok(Level::Info),
            "warn" | "warning" => Ok(Level::Warn),
            "error" => Ok(Level::Error),
            other => Err(format!(
                "invalid level: {other} (expected trace, debug, info, warn, or error)"
            )),
        }
    }
}

/// Routing channel derived from a record's raw `when` tag.
///
/// Anything that is not one of the three reserved tags is a plain log line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    /// Execution bookkeeping (`HIST`): START / terminal pairs.
    Hist,
    /// Engine busy-state transition (`BUSY`), `status` is `YES`/`NO`.
    Busy,
    /// Engine pause-state transition (`PAUSE`), `status` is `YES`/`NO`.
    Pause,
    /// Everything else: a line destined for the persistent log (threshold
    /// permitting).
    Plain,
}

impl Channel {
    pub fn from_when(when: &str) -> Self {
        match when {
            "HIST" => Channel::Hist,
            "BUSY" => Channel::Busy,
            "PAUSE" => Channel::Pause,
            _ => Channel::Plain,
        }
    }
}

/// One decoded unit of the engine's JSON Lines output stream.
///
/// Immutable once decoded. `item`/`item_id` name the scheduler entity the
/// record concerns; both are null for engine-global records. `item_id` may
/// arrive as a JSON number or string and is normalized to a string.
#[derive(Debug, Clone, Deserialize)]
pub struct Record {
    pub time: String,
    pub application: String,
    pub level: Level,
    pub emitter: String,
    pub action: String,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub item: Option<String>,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub item_id: Option<String>,
    pub when: String,
    pub status: String,
    pub message: String,
}

impl Record {
    /// Routing channel for this record, derived from the raw `when` tag.
    pub fn channel(&self) -> Channel {
        Channel::from_when(&self.when)
    }

    /// Parse the record's timestamp. `None` when the engine sent something
    /// that is not in the expected ISO-8601 microsecond form.
    pub fn parsed_time(&self) -> Option<NaiveDateTime> {
        NaiveDateTime::parse_from_str(&self.time, TIME_FORMAT).ok()
    }
}

/// Decode one stdout line into a [`Record`].
///
/// Errors here are per-line and recoverable: the reader logs and skips the
/// line rather than terminating.
pub fn decode_line(line: &str) -> Result<Record> {
    serde_json::from_str(line).context("decoding engine output line as a record")
}

/// Accept `"1"`, `1` or `null` for the nullable identity fields.
fn opt_string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(i64),
    }

    let raw: Option<Raw> = Option::deserialize(deserializer)?;
    Ok(raw.map(|value| match value {
        Raw::Text(s) => s,
        Raw::Number(n) => n.to_string(),
    }))
}
