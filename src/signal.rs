// src/signal.rs

//! Status signal sink: receiver of busy/paused boolean transitions.
//!
//! The sink is owned by whatever layer surfaces engine state to a user
//! (tray icon, GUI, ...). This crate only forwards transitions; it never
//! stores the engine's busy or paused state itself.

use tracing::info;

/// Receives engine state transitions decoded from `BUSY`/`PAUSE` records.
///
/// Calls arrive on the background reader task, so implementations must be
/// cheap and non-blocking.
pub trait StatusSink: Send + Sync {
    /// The engine reported a busy-state transition.
    fn busy(&self, busy: bool);

    /// The engine reported a pause-state transition.
    fn paused(&self, paused: bool);
}

/// Default sink used by the binary: logs transitions via `tracing`.
#[derive(Debug, Default)]
pub struct TracingStatusSink;

impl StatusSink for TracingStatusSink {
    fn busy(&self, busy: bool) {
        info!(busy, "engine busy state changed");
    }

    fn paused(&self, paused: bool) {
        info!(paused, "engine pause state changed");
    }
}
