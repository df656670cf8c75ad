//! External command execution.
//!
//! Every external tool (`gcloud`, `terraform`, `gh`, `uv`, `npm`, ...) is
//! invoked through [`execute`] with an argument vector, never through a
//! shell string. Captured invocations read stdout and stderr on separate
//! threads and honour an optional timeout; interactive invocations inherit
//! the terminal.

use crate::error::{BootstrapError, Result};
use std::collections::HashMap;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

use super::cancel::GroupGuard;

const POLL_INTERVAL: Duration = Duration::from_millis(25);

/// How long to wait for pipes to close after killing leftover processes.
const DRAIN_GRACE: Duration = Duration::from_secs(1);

/// A single external command: program, arguments and execution settings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Invocation {
    /// Program name or path.
    pub program: String,

    /// Arguments passed verbatim.
    pub args: Vec<String>,

    /// Working directory.
    pub cwd: Option<PathBuf>,

    /// Environment variables (merged with system env).
    pub env: HashMap<String, String>,

    /// Data written to the child's stdin, then closed.
    pub stdin: Option<String>,

    /// Time budget (None = wait forever).
    pub timeout: Option<Duration>,

    /// Attach the child to the terminal instead of capturing output.
    pub interactive: bool,
}

impl Invocation {
    /// Create an invocation for `program` with no arguments.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            ..Default::default()
        }
    }

    /// Parse a whitespace-separated command line such as `uv run pytest`.
    ///
    /// Returns `None` for an empty line. Quoting is not supported; the
    /// command lines this tool runs never need it.
    pub fn from_line(line: &str) -> Option<Self> {
        let mut parts = line.split_whitespace();
        let program = parts.next()?;
        Some(Self::new(program).args(parts))
    }

    /// Append one argument.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append several arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Set the working directory.
    pub fn cwd(mut self, dir: &Path) -> Self {
        self.cwd = Some(dir.to_path_buf());
        self
    }

    /// Set one environment variable.
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    /// Feed `input` to the child's stdin.
    pub fn stdin(mut self, input: impl Into<String>) -> Self {
        self.stdin = Some(input.into());
        self
    }

    /// Bound the run time. A zero duration means no timeout.
    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout.filter(|t| !t.is_zero());
        self
    }

    /// Attach the child to the terminal.
    pub fn interactive(mut self) -> Self {
        self.interactive = true;
        self
    }

    /// The command line as shown to users (`gcloud auth list`).
    pub fn display(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn to_command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        if let Some(cwd) = &self.cwd {
            cmd.current_dir(cwd);
        }
        for (key, value) in &self.env {
            cmd.env(key, value);
        }
        cmd
    }
}

/// Result of executing an external command.
#[derive(Debug, Clone)]
pub struct CommandResult {
    /// Exit code (None if killed by signal).
    pub exit_code: Option<i32>,

    /// Standard output.
    pub stdout: String,

    /// Standard error.
    pub stderr: String,

    /// Execution duration.
    pub duration: Duration,

    /// Whether command succeeded (exit code 0).
    pub success: bool,
}

impl CommandResult {
    /// Create a success result.
    pub fn success(stdout: String, stderr: String, duration: Duration) -> Self {
        Self {
            exit_code: Some(0),
            stdout,
            stderr,
            duration,
            success: true,
        }
    }

    /// Create a failure result.
    pub fn failure(
        exit_code: Option<i32>,
        stdout: String,
        stderr: String,
        duration: Duration,
    ) -> Self {
        Self {
            exit_code,
            stdout,
            stderr,
            duration,
            success: false,
        }
    }

    /// Stdout followed by stderr, the way a terminal would show them.
    pub fn combined(&self) -> String {
        match (self.stdout.is_empty(), self.stderr.is_empty()) {
            (_, true) => self.stdout.clone(),
            (true, false) => self.stderr.clone(),
            (false, false) => {
                let mut out = self.stdout.clone();
                if !out.ends_with('\n') {
                    out.push('\n');
                }
                out.push_str(&self.stderr);
                out
            }
        }
    }

    fn from_status(status: ExitStatus, stdout: String, stderr: String, duration: Duration) -> Self {
        if status.success() {
            Self::success(stdout, stderr, duration)
        } else {
            Self::failure(status.code(), stdout, stderr, duration)
        }
    }
}

/// Execute an invocation and wait for it to finish.
///
/// A program that cannot be spawned yields `CommandFailed` with no exit
/// code. Exceeding the timeout kills the child (and, for captured
/// commands, its whole process group) and yields `CommandTimedOut`.
pub fn execute(invocation: &Invocation) -> Result<CommandResult> {
    let start = Instant::now();
    let command_line = invocation.display();
    let mut cmd = invocation.to_command();

    if invocation.interactive {
        cmd.stdout(Stdio::inherit()).stderr(Stdio::inherit());
    } else {
        cmd.stdout(Stdio::piped()).stderr(Stdio::piped());
        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            cmd.process_group(0);
        }
    }

    match (&invocation.stdin, invocation.interactive) {
        (Some(_), _) => cmd.stdin(Stdio::piped()),
        (None, true) => cmd.stdin(Stdio::inherit()),
        (None, false) => cmd.stdin(Stdio::null()),
    };

    tracing::debug!(command = %command_line, timeout = ?invocation.timeout, "spawning");

    let mut child = cmd.spawn().map_err(|e| {
        tracing::debug!(command = %command_line, error = %e, "spawn failed");
        BootstrapError::CommandFailed {
            command: command_line.clone(),
            code: None,
        }
    })?;

    let mut guard = (!invocation.interactive).then(|| GroupGuard::register(child.id()));

    if let (Some(input), Some(mut pipe)) = (invocation.stdin.clone(), child.stdin.take()) {
        thread::spawn(move || {
            let _ = pipe.write_all(input.as_bytes());
        });
    }

    let stdout_rx = child.stdout.take().map(spawn_reader);
    let stderr_rx = child.stderr.take().map(spawn_reader);
    let deadline = invocation.timeout.map(|t| start + t);

    let status = match wait_until(&mut child, deadline)? {
        Some(status) => status,
        None => {
            kill_child(&mut child, guard.as_mut());
            let _ = child.wait();
            let seconds = invocation.timeout.map(|t| t.as_secs()).unwrap_or_default();
            tracing::warn!(command = %command_line, seconds, "command timed out");
            return Err(BootstrapError::CommandTimedOut {
                command: command_line,
                seconds,
            });
        }
    };

    // Background processes left by the child can hold the pipes open.
    let mut stragglers_killed = false;
    let mut drain = |rx: Option<Receiver<String>>| {
        let Some(rx) = rx else {
            return String::new();
        };
        let Some(deadline) = deadline else {
            return rx.recv().unwrap_or_default();
        };
        match rx.recv_timeout(deadline.saturating_duration_since(Instant::now())) {
            Ok(text) => text,
            Err(RecvTimeoutError::Disconnected) => String::new(),
            Err(RecvTimeoutError::Timeout) => {
                if !stragglers_killed {
                    stragglers_killed = true;
                    tracing::warn!(
                        command = %command_line,
                        "output still open at the deadline, killing leftover processes"
                    );
                    kill_stragglers(guard.as_ref());
                }
                rx.recv_timeout(DRAIN_GRACE).unwrap_or_default()
            }
        }
    };
    let stdout = drain(stdout_rx);
    let stderr = drain(stderr_rx);

    if let Some(g) = guard.as_mut() {
        g.disarm();
    }

    let result = CommandResult::from_status(status, stdout, stderr, start.elapsed());
    tracing::debug!(
        command = %command_line,
        exit_code = ?result.exit_code,
        elapsed_ms = result.duration.as_millis() as u64,
        "finished"
    );
    Ok(result)
}

/// Spawn a long-running process attached to the terminal without waiting.
///
/// Used for the backend and UI servers, which are never supervised.
pub fn spawn(invocation: &Invocation) -> Result<Child> {
    let command_line = invocation.display();
    tracing::debug!(command = %command_line, "spawning unmanaged process");
    invocation
        .to_command()
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .spawn()
        .map_err(|_| BootstrapError::CommandFailed {
            command: command_line,
            code: None,
        })
}

/// Start every invocation side by side with the terminal attached, then
/// wait for all of them.
///
/// Processes are not supervised: one exiting does not stop the others.
/// An invocation that cannot be spawned yields a failed result with no
/// exit code.
pub fn execute_all(invocations: &[Invocation]) -> Vec<CommandResult> {
    let start = Instant::now();
    let children: Vec<Option<Child>> = invocations
        .iter()
        .map(|invocation| match spawn(invocation) {
            Ok(child) => Some(child),
            Err(e) => {
                tracing::warn!(error = %e, "could not start process");
                None
            }
        })
        .collect();

    children
        .into_iter()
        .map(|child| {
            let status = child.and_then(|mut c| c.wait().ok());
            match status {
                Some(status) => {
                    CommandResult::from_status(status, String::new(), String::new(), start.elapsed())
                }
                None => CommandResult::failure(None, String::new(), String::new(), start.elapsed()),
            }
        })
        .collect()
}

/// Execute a captured command and return success/failure.
pub fn execute_check(invocation: &Invocation) -> bool {
    execute(invocation).map(|r| r.success).unwrap_or(false)
}

/// Read `source` to the end on its own thread; the text arrives once the
/// pipe closes.
fn spawn_reader<R: Read + Send + 'static>(mut source: R) -> Receiver<String> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let mut buf = Vec::new();
        let _ = source.read_to_end(&mut buf);
        let _ = tx.send(String::from_utf8_lossy(&buf).into_owned());
    });
    rx
}

/// Wait for the child; `Ok(None)` means the deadline passed first.
fn wait_until(child: &mut Child, deadline: Option<Instant>) -> Result<Option<ExitStatus>> {
    let Some(deadline) = deadline else {
        return Ok(Some(child.wait()?));
    };

    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(Some(status));
        }
        if Instant::now() >= deadline {
            return Ok(None);
        }
        thread::sleep(POLL_INTERVAL);
    }
}

/// Kill a child that ran out of time; a captured child takes its whole
/// group with it, exactly once.
fn kill_child(child: &mut Child, guard: Option<&mut GroupGuard>) {
    match guard {
        Some(g) if cfg!(unix) => g.kill(),
        _ => {
            let _ = child.kill();
        }
    }
}

/// Kill what is left of the group after its leader exited.
#[cfg(unix)]
fn kill_stragglers(guard: Option<&GroupGuard>) {
    if let Some(g) = guard {
        super::cancel::kill_group(g.pgid());
    }
}

#[cfg(not(unix))]
fn kill_stragglers(_guard: Option<&GroupGuard>) {}
