// src/supervisor/process.rs

use std::path::PathBuf;
use std::process::Stdio;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};
use tokio::task::JoinHandle;
use tokio::time::{sleep, timeout};
use tracing::{debug, error, info, warn};

use crate::history::{ExecutionHistory, HistoryEntry};
use crate::record::RecordBuilder;
use crate::route::LogRouter;
use crate::supervisor::reader;

/// How long shutdown waits for the reader task (and later the process) to
/// finish before aborting the reader and force-killing the engine.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

/// Lifecycle of one supervised engine. Single-shot: a supervisor that has
/// reached `Stopped` is not restarted, a new one is built instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SupervisorState {
    NotStarted,
    Running,
    Stopped,
}

/// How to launch the engine and how fast to poll it.
#[derive(Debug, Clone)]
pub struct SupervisorOptions {
    /// Path to the engine executable.
    pub engine_path: PathBuf,
    /// Path to the engine's own configuration file (opaque to us).
    pub engine_config: PathBuf,
    /// Level passed to the engine's `--log-level` flag.
    pub engine_log_level: String,
    /// Tick interval: the startup liveness wait, the reader's inter-burst
    /// sleep, and the shutdown flush grace.
    pub tick: Duration,
}

/// Owns one external engine process and its three standard streams.
///
/// Commands are written to the child's stdin one line at a time and are
/// fire-and-forget: a `true` return means "accepted for delivery", never
/// "engine complied". Callers needing confirmation correlate against later
/// status records themselves. The engine's stdout is pumped by a background
/// reader task into the router and, for bookkeeping records, into execution
/// history.
///
/// No paused state is tracked here: pause/resume are advisory commands, and
/// the engine's acknowledgement arrives later as a `PAUSE` record that is
/// only ever forwarded to the status sink.
pub struct EngineSupervisor {
    options: SupervisorOptions,
    router: Arc<LogRouter>,
    history: Arc<ExecutionHistory>,
    state: SupervisorState,
    /// Polled by the reader between bursts; cleared to stop it.
    running: Arc<AtomicBool>,
    child: Option<Child>,
    stdin: Option<ChildStdin>,
    reader: Option<JoinHandle<BufReader<ChildStdout>>>,
}

impl EngineSupervisor {
    pub fn new(
        options: SupervisorOptions,
        router: Arc<LogRouter>,
        history: Arc<ExecutionHistory>,
    ) -> Self {
        Self {
            options,
            router,
            history,
            state: SupervisorState::NotStarted,
            running: Arc::new(AtomicBool::new(false)),
            child: None,
            stdin: None,
            reader: None,
        }
    }

    pub fn state(&self) -> SupervisorState {
        self.state
    }

    /// Spawn the engine and the background reader, then wait one tick for
    /// liveness.
    ///
    /// Returns `false` on spawn failure or when the process has already
    /// exited by the end of the tick; in the latter case any output it
    /// produced before dying is still drained through the normal
    /// decode-and-route path, and no reader is left running.
    pub async fn start(&mut self) -> bool {
        if self.state != SupervisorState::NotStarted {
            warn!(state = ?self.state, "start called on an already-started supervisor");
            return false;
        }

        info!(
            engine = ?self.options.engine_path,
            config = ?self.options.engine_config,
            "starting engine"
        );

        let mut cmd = Command::new(&self.options.engine_path);
        cmd.arg("--log-level")
            .arg(&self.options.engine_log_level)
            .arg("--log-json")
            .arg(&self.options.engine_config)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let mut child = match cmd.spawn() {
            Ok(child) => child,
            Err(err) => {
                error!(
                    error = %err,
                    engine = ?self.options.engine_path,
                    "failed to spawn engine"
                );
                self.state = SupervisorState::Stopped;
                return false;
            }
        };

        self.stdin = child.stdin.take();
        let Some(stdout) = child.stdout.take() else {
            error!("engine spawned without a stdout pipe");
            let _ = child.start_kill();
            self.state = SupervisorState::Stopped;
            return false;
        };

        // Always consume stderr so buffers don't fill; log at debug.
        if let Some(stderr) = child.stderr.take() {
            tokio::spawn(async move {
                let mut lines = BufReader::new(stderr).lines();
                while let Ok(Some(line)) = lines.next_line().await {
                    debug!("engine stderr: {}", line);
                }
            });
        }

        self.running.store(true, Ordering::Release);
        self.reader = Some(tokio::spawn(reader::read_loop(
            BufReader::new(stdout),
            self.running.clone(),
            self.router.clone(),
            self.history.clone(),
            self.options.tick,
        )));
        self.child = Some(child);

        sleep(self.options.tick).await;

        if !self.child_alive() {
            warn!("engine exited immediately after spawn");
            self.running.store(false, Ordering::Release);
            if let Some(reader) = self.join_reader().await {
                self.drain_remaining(reader).await;
            }
            self.reap().await;
            self.state = SupervisorState::Stopped;
            return false;
        }

        self.state = SupervisorState::Running;
        self.note("start", format!("engine started: {:?}", self.options.engine_path));
        true
    }

    /// Write `"<verb>[ <args>]\n"` to the engine's stdin and flush.
    ///
    /// A no-op returning `false` unless the process is alive and the reader
    /// is active; `true` once the line is written, with no acknowledgement
    /// awaited.
    pub async fn command(&mut self, verb: &str, args: &[&str]) -> bool {
        if self.state != SupervisorState::Running
            || !self.running.load(Ordering::Acquire)
            || !self.child_alive()
        {
            debug!(verb, "command ignored: engine is not running");
            return false;
        }
        let Some(stdin) = self.stdin.as_mut() else {
            debug!(verb, "command ignored: engine stdin pipe is gone");
            return false;
        };

        let mut line = verb.to_string();
        if !args.is_empty() {
            line.push(' ');
            line.push_str(&args.join(" "));
        }
        line.push('\n');

        debug!(command = %line.trim_end(), "sending command to engine");
        if let Err(err) = stdin.write_all(line.as_bytes()).await {
            warn!(error = %err, verb, "failed to write command to engine stdin");
            return false;
        }
        if let Err(err) = stdin.flush().await {
            warn!(error = %err, verb, "failed to flush engine stdin");
            return false;
        }
        true
    }

    pub async fn pause(&mut self) -> bool {
        self.command("pause", &[]).await
    }

    pub async fn resume(&mut self) -> bool {
        self.command("resume", &[]).await
    }

    /// Reset the named conditions, or all of them when `names` is empty.
    pub async fn reset_conditions(&mut self, names: &[&str]) -> bool {
        self.command("reset_conditions", names).await
    }

    pub async fn suspend_condition(&mut self, name: &str) -> bool {
        self.command("suspend_condition", &[name]).await
    }

    pub async fn resume_condition(&mut self, name: &str) -> bool {
        self.command("resume_condition", &[name]).await
    }

    pub async fn trigger(&mut self, name: &str) -> bool {
        self.command("trigger", &[name]).await
    }

    /// Ask the engine to exit gracefully, then wind down the reader and
    /// drain any remaining buffered stdout lines through the normal route
    /// path.
    ///
    /// The reader join is bounded: if the engine never exits and never
    /// closes its stdout, the reader is aborted after [`SHUTDOWN_GRACE`] and
    /// the process force-killed (so this call cannot block forever).
    /// Returns `false` if the process was not alive to begin with.
    pub async fn exit(&mut self) -> bool {
        self.shutdown("exit", true).await
    }

    /// As [`EngineSupervisor::exit`], but sends `kill` and performs no final
    /// drain: the engine is assumed not to flush gracefully after a kill.
    pub async fn kill(&mut self) -> bool {
        self.shutdown("kill", false).await
    }

    /// Defensive copy of the execution history, oldest entry first. Safe to
    /// call from any thread, concurrently with the reader.
    pub fn history_snapshot(&self) -> Vec<HistoryEntry> {
        self.history.snapshot()
    }

    async fn shutdown(&mut self, verb: &'static str, drain: bool) -> bool {
        if self.state != SupervisorState::Running || !self.child_alive() {
            debug!(verb, "shutdown requested but engine is not running");
            return false;
        }

        self.command(verb, &[]).await;
        self.running.store(false, Ordering::Release);

        // One tick for the engine to flush its final output.
        sleep(self.options.tick).await;

        let reader = self.join_reader().await;
        if drain {
            if let Some(reader) = reader {
                self.drain_remaining(reader).await;
            }
        }

        self.reap().await;
        self.state = SupervisorState::Stopped;
        self.note("stop", format!("engine stopped via {verb}"));
        true
    }

    fn child_alive(&mut self) -> bool {
        match self.child.as_mut() {
            Some(child) => matches!(child.try_wait(), Ok(None)),
            None => false,
        }
    }

    /// Join the reader task, aborting it (and force-killing the engine) if
    /// it does not stop within the grace period.
    async fn join_reader(&mut self) -> Option<BufReader<ChildStdout>> {
        let mut handle = self.reader.take()?;
        match timeout(SHUTDOWN_GRACE, &mut handle).await {
            Ok(Ok(reader)) => Some(reader),
            Ok(Err(err)) => {
                warn!(error = %err, "engine stdout reader task failed");
                None
            }
            Err(_) => {
                warn!(
                    grace = ?SHUTDOWN_GRACE,
                    "reader did not stop within the grace period; aborting it and killing the engine"
                );
                handle.abort();
                if let Some(child) = self.child.as_mut() {
                    let _ = child.start_kill();
                }
                None
            }
        }
    }

    /// Synchronously route whatever is still buffered on the engine's
    /// stdout after the reader has stopped.
    async fn drain_remaining(&self, stdout: BufReader<ChildStdout>) {
        let mut lines = stdout.lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => reader::route_line(&line, &self.router, &self.history),
                Ok(None) => break,
                Err(err) => {
                    warn!(error = %err, "error draining engine stdout");
                    break;
                }
            }
        }
    }

    async fn reap(&mut self) {
        let Some(mut child) = self.child.take() else {
            return;
        };
        match timeout(SHUTDOWN_GRACE, child.wait()).await {
            Ok(Ok(status)) => info!(%status, "engine process exited"),
            Ok(Err(err)) => warn!(error = %err, "waiting for engine process"),
            Err(_) => {
                warn!("engine did not exit within the grace period; killing it");
                if let Err(err) = child.kill().await {
                    warn!(error = %err, "killing engine process");
                }
            }
        }
    }

    /// Push a bookkeeping record of our own through the router.
    fn note(&self, action: &str, message: String) {
        match RecordBuilder::new()
            .emitter("supervisor")
            .action(action)
            .message(message)
            .build()
        {
            Ok(record) => {
                let _ = self.router.classify(&record);
            }
            Err(err) => debug!(error = %err, "failed to build bookkeeping record"),
        }
    }
}
