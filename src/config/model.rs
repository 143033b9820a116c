// src/config/model.rs

use serde::Deserialize;

/// Top-level supervisor configuration as read from a TOML file.
///
/// This configures the supervisor itself, not the engine: the engine's own
/// configuration file is named here but stays opaque to us.
///
/// ```toml
/// [engine]
/// path = "/usr/local/bin/whenever"
/// config = "/home/user/.whenever/whenever.toml"
/// log_level = "trace"
///
/// [log]
/// file = "stoker.log"
/// level = "warn"
/// append = false
/// mirror_history = false
///
/// [history]
/// capacity = 100
///
/// [supervisor]
/// tick_ms = 1000
/// ```
///
/// Everything except `[engine]` is optional and has reasonable defaults.
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigFile {
    /// How to launch the engine, from `[engine]`.
    pub engine: EngineSection,

    /// Persistent-log routing, from `[log]`.
    #[serde(default)]
    pub log: LogSection,

    /// Execution-history sizing, from `[history]`.
    #[serde(default)]
    pub history: HistorySection,

    /// Supervisor timing, from `[supervisor]`.
    #[serde(default)]
    pub supervisor: SupervisorSection,
}

/// `[engine]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct EngineSection {
    /// Path to the engine executable.
    pub path: String,

    /// Path to the engine's configuration file, passed through verbatim.
    pub config: String,

    /// Level handed to the engine's `--log-level` flag. The engine is asked
    /// for everything by default; filtering happens on our side.
    #[serde(default = "default_engine_log_level")]
    pub log_level: String,
}

fn default_engine_log_level() -> String {
    "trace".to_string()
}

/// `[log]` section: where qualifying records land and what qualifies.
#[derive(Debug, Clone, Deserialize)]
pub struct LogSection {
    /// Flat text file receiving one formatted line per qualifying record.
    #[serde(default = "default_log_file")]
    pub file: String,

    /// Minimum level a plain record needs to reach the file.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Append to an existing file instead of truncating it at startup.
    #[serde(default)]
    pub append: bool,

    /// Also mirror `HIST` bookkeeping records to the file (audit trail).
    #[serde(default)]
    pub mirror_history: bool,
}

fn default_log_file() -> String {
    "stoker.log".to_string()
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for LogSection {
    fn default() -> Self {
        Self {
            file: default_log_file(),
            level: default_log_level(),
            append: false,
            mirror_history: false,
        }
    }
}

/// `[history]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct HistorySection {
    /// Maximum number of completed-execution entries to keep; oldest are
    /// evicted first.
    #[serde(default = "default_history_capacity")]
    pub capacity: usize,
}

fn default_history_capacity() -> usize {
    100
}

impl Default for HistorySection {
    fn default() -> Self {
        Self {
            capacity: default_history_capacity(),
        }
    }
}

/// `[supervisor]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct SupervisorSection {
    /// Tick interval in milliseconds: the startup liveness wait, the
    /// reader's inter-burst sleep, and the shutdown flush grace.
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,
}

fn default_tick_ms() -> u64 {
    1000
}

impl Default for SupervisorSection {
    fn default() -> Self {
        Self {
            tick_ms: default_tick_ms(),
        }
    }
}
