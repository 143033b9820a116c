// src/errors.rs

//! Crate-wide error aliases.
//!
//! Spawn and shutdown failures cross the supervisor API as plain booleans;
//! everything else (config loading, sink wiring) uses `anyhow` through these
//! aliases, giving a single place to introduce structured error types later.

pub use anyhow::{Error, Result};
