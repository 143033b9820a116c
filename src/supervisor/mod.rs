// src/supervisor/mod.rs

//! Process supervisor: owns the engine child process, its command channel,
//! and the background stdout reader.

mod process;
mod reader;

pub use process::{EngineSupervisor, SupervisorOptions, SupervisorState};
