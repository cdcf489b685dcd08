//! External command execution.
//!
//! Commands are always spawned directly with an argument vector; nothing
//! here goes through a shell, so artifact names reach the tool verbatim.
use std::io::{self, Read};
use std::process::{Command, Output, Stdio};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use wait_timeout::ChildExt as _;

use crate::error::ExecError;

/// Result of a command execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecResult {
    /// Captured standard output.
    pub stdout: String,
    /// Captured standard error.
    pub stderr: String,
    /// Whether the process exited with status zero.
    pub success: bool,
    /// Exit code, or `None` when the process was terminated by a signal.
    pub code: Option<i32>,
}

impl From<Output> for ExecResult {
    fn from(output: Output) -> Self {
        Self {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            success: output.status.success(),
            code: output.status.code(),
        }
    }
}

/// Runs external programs on behalf of the engine.
pub trait Executor: Send + Sync {
    /// Run `program` with `args` as separate argv elements.
    ///
    /// A process that starts and exits is always `Ok`, whatever its exit
    /// status; callers inspect [`ExecResult::code`].
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be started, its output cannot
    /// be collected, or it outlives the executor's timeout.
    fn run(&self, program: &str, args: &[&str]) -> Result<ExecResult, ExecError>;
}

/// [`Executor`] that spawns real processes, optionally bounded by a timeout.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemExecutor {
    timeout: Option<Duration>,
}

impl SystemExecutor {
    /// Executor that waits for commands indefinitely.
    #[must_use]
    pub const fn new() -> Self {
        Self { timeout: None }
    }

    /// Executor that kills commands still running after `timeout`.
    #[must_use]
    pub const fn with_timeout(timeout: Option<Duration>) -> Self {
        Self { timeout }
    }

    /// The configured timeout, if any.
    #[must_use]
    pub const fn timeout(&self) -> Option<Duration> {
        self.timeout
    }
}

impl Executor for SystemExecutor {
    fn run(&self, program: &str, args: &[&str]) -> Result<ExecResult, ExecError> {
        let mut cmd = Command::new(program);
        cmd.args(args).stdin(Stdio::null());

        match self.timeout {
            None => cmd
                .output()
                .map(ExecResult::from)
                .map_err(|source| ExecError::Spawn {
                    program: program.to_string(),
                    source,
                }),
            Some(timeout) => run_with_timeout(cmd, program, timeout),
        }
    }
}

/// Spawn `cmd` and wait at most `timeout` for it to exit.
///
/// Both pipes are drained on their own threads while waiting, so a child
/// that writes more than a pipe buffer never stalls on a full pipe.  On
/// expiry the child is killed and reaped before returning.
fn run_with_timeout(
    mut cmd: Command,
    program: &str,
    timeout: Duration,
) -> Result<ExecResult, ExecError> {
    let wait_error = |source: io::Error| ExecError::Wait {
        program: program.to_string(),
        source,
    };

    let mut child = cmd
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|source| ExecError::Spawn {
            program: program.to_string(),
            source,
        })?;

    let stdout_reader = child.stdout.take().map(drain);
    let stderr_reader = child.stderr.take().map(drain);

    let waited = child.wait_timeout(timeout);
    let status = match waited {
        Ok(Some(status)) => Some(status),
        Ok(None) | Err(_) => {
            let _ = child.kill();
            let _ = child.wait();
            None
        }
    };

    // The readers finish once every holder of the write ends has exited.
    let stdout = collect(stdout_reader);
    let stderr = collect(stderr_reader);

    let Some(status) = status else {
        return Err(match waited {
            Err(source) => wait_error(source),
            Ok(_) => ExecError::TimedOut {
                program: program.to_string(),
                timeout,
            },
        });
    };

    Ok(ExecResult::from(Output {
        status,
        stdout: stdout.map_err(wait_error)?,
        stderr: stderr.map_err(wait_error)?,
    }))
}

/// Read `pipe` to the end on a background thread.
fn drain<R: Read + Send + 'static>(mut pipe: R) -> JoinHandle<io::Result<Vec<u8>>> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        pipe.read_to_end(&mut buf)?;
        Ok(buf)
    })
}

/// Join a reader started by [`drain`]; a missing pipe yields no output.
fn collect(reader: Option<JoinHandle<io::Result<Vec<u8>>>>) -> io::Result<Vec<u8>> {
    reader.map_or_else(
        || Ok(Vec::new()),
        |handle| {
            handle
                .join()
                .unwrap_or_else(|_| Err(io::Error::other("output reader panicked")))
        },
    )
}
