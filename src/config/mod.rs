// src/config/mod.rs

//! Supervisor configuration: TOML model, loader and validation.
//!
//! This is our own configuration, not the engine's; the engine config file
//! is referenced here but never parsed.

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{load_and_validate, load_from_path};
pub use model::{ConfigFile, EngineSection, HistorySection, LogSection, SupervisorSection};
