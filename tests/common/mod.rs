#![allow(dead_code)]

use std::io::Write;
use std::sync::{Arc, Mutex};

use stoker::record::{Level, Record, RecordBuilder};
use stoker::signal::StatusSink;

/// In-memory persistent-log sink whose contents stay readable after the
/// router has taken ownership of the writer half.
#[derive(Clone, Default)]
pub struct SharedSink(Arc<Mutex<Vec<u8>>>);

impl SharedSink {
    pub fn contents(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }

    pub fn lines(&self) -> Vec<String> {
        self.contents().lines().map(|l| l.to_string()).collect()
    }
}

impl Write for SharedSink {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

/// Status sink that records every transition it receives.
#[derive(Default)]
pub struct RecordingStatusSink {
    pub busy: Mutex<Vec<bool>>,
    pub paused: Mutex<Vec<bool>>,
}

impl StatusSink for RecordingStatusSink {
    fn busy(&self, busy: bool) {
        self.busy.lock().unwrap().push(busy);
    }

    fn paused(&self, paused: bool) {
        self.paused.lock().unwrap().push(paused);
    }
}

/// A `HIST`-channel record for the given item identity.
pub fn hist_record(item: &str, item_id: &str, status: &str, time: &str, message: &str) -> Record {
    RecordBuilder::new()
        .time(time)
        .level(Level::Info)
        .emitter("task")
        .action("run")
        .item(item)
        .item_id(item_id)
        .when("HIST")
        .status(status)
        .message(message)
        .build()
        .unwrap()
}

/// A plain-channel record at the given level.
pub fn plain_record(level: Level, message: &str) -> Record {
    RecordBuilder::new()
        .time("2026-08-23T10:00:00.000000")
        .level(level)
        .emitter("core")
        .action("tick")
        .when("PROC")
        .status("MSG")
        .message(message)
        .build()
        .unwrap()
}

/// A `BUSY` or `PAUSE` status-transition record.
pub fn status_record(when: &str, status: &str) -> Record {
    RecordBuilder::new()
        .time("2026-08-23T10:00:00.000000")
        .level(Level::Debug)
        .emitter("scheduler")
        .action("state")
        .when(when)
        .status(status)
        .message("state change")
        .build()
        .unwrap()
}
