// src/supervisor/reader.rs

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::ChildStdout;
use tokio::time::sleep;
use tracing::{debug, warn};

use crate::history::ExecutionHistory;
use crate::record;
use crate::route::{Disposition, LogRouter};

/// Background reader loop over the engine's stdout.
///
/// Reads one line at a time and fans it out through [`route_line`]. On
/// end-of-burst (EOF) it sleeps one tick and re-polls while the shared
/// running flag holds; the flag is checked between bursts, never by
/// cancelling an in-flight read. Records are therefore processed in the
/// exact order the engine wrote them.
///
/// Returns the buffered reader on exit so the supervisor can drain any
/// remaining lines synchronously during shutdown.
pub(crate) async fn read_loop(
    stdout: BufReader<ChildStdout>,
    running: Arc<AtomicBool>,
    router: Arc<LogRouter>,
    history: Arc<ExecutionHistory>,
    tick: Duration,
) -> BufReader<ChildStdout> {
    let mut lines = stdout.lines();

    loop {
        match lines.next_line().await {
            Ok(Some(line)) => route_line(&line, &router, &history),
            Ok(None) => {
                if !running.load(Ordering::Acquire) {
                    break;
                }
                sleep(tick).await;
            }
            Err(err) => {
                warn!(error = %err, "error reading engine stdout");
                if !running.load(Ordering::Acquire) {
                    break;
                }
                sleep(tick).await;
            }
        }
    }

    debug!("engine stdout reader stopped");
    lines.into_inner()
}

/// Decode one stdout line and route it.
///
/// Empty lines are skipped. A malformed line is logged and dropped at this
/// granularity so one bad record never terminates the reader or loses the
/// records behind it. Records the router does not consume are execution
/// bookkeeping and go to history.
pub(crate) fn route_line(line: &str, router: &LogRouter, history: &ExecutionHistory) {
    let line = line.trim();
    if line.is_empty() {
        return;
    }

    match record::decode_line(line) {
        Ok(record) => {
            if router.classify(&record) == Disposition::History {
                history.append(&record);
            }
        }
        Err(err) => {
            warn!(error = %err, line, "skipping undecodable engine output line");
        }
    }
}
