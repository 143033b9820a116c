// src/history/mod.rs

//! Execution history: correlates paired `HIST` records into bounded,
//! ordered, duration-bearing entries.

mod message;
mod store;

pub use store::{ExecutionHistory, HistoryEntry};
