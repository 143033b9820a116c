// src/lib.rs

pub mod cli;
pub mod config;
pub mod errors;
pub mod history;
pub mod logging;
pub mod record;
pub mod route;
pub mod signal;
pub mod supervisor;

use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Result, anyhow};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};

use crate::cli::CliArgs;
use crate::config::load_and_validate;
use crate::history::ExecutionHistory;
use crate::record::Level;
use crate::route::LogRouter;
use crate::signal::TracingStatusSink;
use crate::supervisor::{EngineSupervisor, SupervisorOptions};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading
/// - the log router (persistent sink + status signals)
/// - execution history
/// - the engine supervisor
/// - an operator command loop on our own stdin
/// - Ctrl-C handling
pub async fn run(args: CliArgs) -> Result<()> {
    let mut cfg = load_and_validate(&args.config)?;
    if let Some(engine) = args.engine {
        cfg.engine.path = engine;
    }

    let threshold = Level::from_str(&cfg.log.level).map_err(|e| anyhow!(e))?;
    let router = Arc::new(LogRouter::to_file(
        &cfg.log.file,
        cfg.log.append,
        threshold,
        cfg.log.mirror_history,
    )?);
    router.set_status_sink(Arc::new(TracingStatusSink));

    let history = Arc::new(ExecutionHistory::new(cfg.history.capacity));

    let options = SupervisorOptions {
        engine_path: PathBuf::from(&cfg.engine.path),
        engine_config: PathBuf::from(&cfg.engine.config),
        engine_log_level: cfg.engine.log_level.clone(),
        tick: Duration::from_millis(cfg.supervisor.tick_ms),
    };
    let mut supervisor = EngineSupervisor::new(options, router, history);

    if !supervisor.start().await {
        return Err(anyhow!(
            "engine failed to start; check [engine].path and the engine's own log"
        ));
    }

    operator_loop(&mut supervisor).await;

    if !supervisor.exit().await {
        warn!("engine was already gone at shutdown");
    }
    Ok(())
}

enum OperatorAction {
    Continue,
    Quit,
}

/// Forward operator commands typed on our stdin to the engine until `exit`,
/// `quit`, Ctrl-C, or stdin closing.
async fn operator_loop(supervisor: &mut EngineSupervisor) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            result = tokio::signal::ctrl_c() => {
                if let Err(e) = result {
                    eprintln!("failed to listen for Ctrl+C: {e}");
                }
                info!("interrupt received, stopping engine");
                break;
            }
            line = lines.next_line() => match line {
                Ok(Some(line)) => {
                    if matches!(dispatch(supervisor, line.trim()).await, OperatorAction::Quit) {
                        break;
                    }
                }
                Ok(None) | Err(_) => {
                    // stdin closed (e.g. running detached): keep supervising
                    // until interrupted.
                    if let Err(e) = tokio::signal::ctrl_c().await {
                        eprintln!("failed to listen for Ctrl+C: {e}");
                    }
                    info!("interrupt received, stopping engine");
                    break;
                }
            }
        }
    }
}

/// Map one operator line onto the supervisor's command API.
///
/// Every engine command is fire-and-forget; `accepted` below means the line
/// was written to the engine's stdin, not that the engine complied.
async fn dispatch(supervisor: &mut EngineSupervisor, line: &str) -> OperatorAction {
    let mut parts = line.split_whitespace();
    let Some(verb) = parts.next() else {
        return OperatorAction::Continue;
    };
    let args: Vec<&str> = parts.collect();

    let accepted = match verb {
        "exit" | "quit" => return OperatorAction::Quit,
        "history" => {
            print_history(supervisor);
            return OperatorAction::Continue;
        }
        "pause" => supervisor.pause().await,
        "resume" => supervisor.resume().await,
        "reset_conditions" => supervisor.reset_conditions(&args).await,
        "suspend_condition" if args.len() == 1 => supervisor.suspend_condition(args[0]).await,
        "resume_condition" if args.len() == 1 => supervisor.resume_condition(args[0]).await,
        "trigger" if args.len() == 1 => supervisor.trigger(args[0]).await,
        _ => {
            warn!(line, "unknown or malformed operator command");
            return OperatorAction::Continue;
        }
    };

    info!(verb, accepted, "operator command");
    OperatorAction::Continue
}

/// Newest-first presentation of the history snapshot (the store itself is
/// oldest-first).
fn print_history(supervisor: &EngineSupervisor) {
    let entries = supervisor.history_snapshot();
    println!("execution history ({} entries, newest first):", entries.len());
    for entry in entries.iter().rev() {
        println!(
            "  {} {}/{} trigger={} outcome={} duration={:.3}s {}",
            entry.time,
            entry.task,
            entry.task_id,
            entry.trigger,
            entry.success,
            entry.duration.as_secs_f64(),
            entry.message
        );
    }
}
