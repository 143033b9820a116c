// src/config/validate.rs

use std::str::FromStr;

use anyhow::{Context, Result, anyhow};

use crate::config::model::ConfigFile;
use crate::record::Level;

/// Run basic semantic validation against a loaded configuration.
///
/// This checks:
/// - `[engine].path` and `[engine].config` are non-empty
/// - `[engine].log_level` and `[log].level` are known level names
/// - `[log].file` is non-empty
/// - `[history].capacity >= 1`
/// - `[supervisor].tick_ms >= 1`
///
/// It does **not** check that the engine executable exists or is runnable;
/// that surfaces as a startup failure at spawn time.
pub fn validate_config(cfg: &ConfigFile) -> Result<()> {
    validate_engine(cfg)?;
    validate_log(cfg)?;
    validate_limits(cfg)?;
    Ok(())
}

fn validate_engine(cfg: &ConfigFile) -> Result<()> {
    if cfg.engine.path.trim().is_empty() {
        return Err(anyhow!("[engine].path must not be empty"));
    }
    if cfg.engine.config.trim().is_empty() {
        return Err(anyhow!("[engine].config must not be empty"));
    }
    Level::from_str(&cfg.engine.log_level)
        .map_err(|e| anyhow!(e))
        .context("invalid [engine].log_level")?;
    Ok(())
}

fn validate_log(cfg: &ConfigFile) -> Result<()> {
    if cfg.log.file.trim().is_empty() {
        return Err(anyhow!("[log].file must not be empty"));
    }
    Level::from_str(&cfg.log.level)
        .map_err(|e| anyhow!(e))
        .context("invalid [log].level")?;
    Ok(())
}

fn validate_limits(cfg: &ConfigFile) -> Result<()> {
    if cfg.history.capacity == 0 {
        return Err(anyhow!("[history].capacity must be >= 1 (got 0)"));
    }
    if cfg.supervisor.tick_ms == 0 {
        return Err(anyhow!("[supervisor].tick_ms must be >= 1 (got 0)"));
    }
    Ok(())
}
