// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, ValueEnum};

/// Command-line arguments for `stoker`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "stoker",
    version,
    about = "Supervise a scheduling engine and bridge its structured log stream.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the supervisor config file (TOML).
    ///
    /// Default: `Stoker.toml` in the current working directory.
    #[arg(long, value_name = "PATH", default_value = "Stoker.toml")]
    pub config: String,

    /// Override the engine executable path from `[engine].path`.
    #[arg(long, value_name = "PATH")]
    pub engine: Option<String>,

    /// Logging level for the supervisor's own diagnostics
    /// (error, warn, info, debug, trace).
    ///
    /// If omitted, `STOKER_LOG` or a default level will be used. This is
    /// independent of `[log].level`, which filters the engine's records.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
