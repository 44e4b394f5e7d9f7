//! External command execution utilities.
//!
//! Provides a Builder-based API for running a command to completion with a
//! deadline, capturing stdout and stderr.
//!
//! # Examples
//!
//! ```ignore
//! use crate::utils::exec::{Cmd, Outcome};
//!
//! let outcome = Cmd::new("pandoc")
//!     .args(["--to", "html5", "notes.md"])
//!     .timeout(Duration::from_secs(60))
//!     .cancel_when(crate::core::is_shutdown)
//!     .run()?;
//! ```

use std::{
    ffi::{OsStr, OsString},
    io::{self, Read},
    process::{Child, Command, ExitStatus, Stdio},
    thread::{self, JoinHandle},
    time::{Duration, Instant},
};

/// How often a running child is checked for exit, deadline and cancellation.
const POLL_INTERVAL: Duration = Duration::from_millis(10);

// ============================================================================
// Builder API
// ============================================================================

/// Command builder for external process execution.
pub struct Cmd {
    program: OsString,
    args: Vec<OsString>,
    timeout: Option<Duration>,
    cancel: Option<fn() -> bool>,
}

/// Captured output of a process that ran to completion.
#[derive(Debug)]
pub struct Finished {
    pub status: ExitStatus,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

/// How a command run ended.
#[derive(Debug)]
pub enum Outcome {
    /// The process exited on its own (successfully or not).
    Exited(Finished),
    /// The deadline passed; the process was killed.
    TimedOut,
    /// The cancel predicate fired; the process was killed.
    Cancelled,
}

impl Cmd {
    /// Create a new command builder.
    pub fn new<S: AsRef<OsStr>>(program: S) -> Self {
        Self {
            program: program.as_ref().to_owned(),
            args: Vec::new(),
            timeout: None,
            cancel: None,
        }
    }

    /// Add a single argument.
    pub fn arg<S: AsRef<OsStr>>(mut self, arg: S) -> Self {
        let arg = arg.as_ref();
        if !arg.is_empty() {
            self.args.push(arg.to_owned());
        }
        self
    }

    /// Add multiple arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        for arg in args {
            let arg = arg.as_ref();
            if !arg.is_empty() {
                self.args.push(arg.to_owned());
            }
        }
        self
    }

    /// Kill the process if it runs longer than `limit`.
    pub fn timeout(mut self, limit: Duration) -> Self {
        self.timeout = Some(limit);
        self
    }

    /// Kill the process as soon as `predicate` returns true.
    pub fn cancel_when(mut self, predicate: fn() -> bool) -> Self {
        self.cancel = Some(predicate);
        self
    }

    /// Arguments collected so far (for diagnostics and tests).
    pub fn get_args(&self) -> impl Iterator<Item = &OsStr> {
        self.args.iter().map(OsString::as_os_str)
    }

    /// Execute the command, waiting until it exits, times out or is cancelled.
    ///
    /// Only a failure to spawn (or to poll) the process is an `Err`.
    pub fn run(self) -> io::Result<Outcome> {
        let mut command = Command::new(&self.program);
        command
            .args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        // Own process group, so a kill also reaches wrapper scripts' children.
        #[cfg(unix)]
        std::os::unix::process::CommandExt::process_group(&mut command, 0);
        let mut child = command.spawn()?;

        // Drain both pipes concurrently so a chatty child never blocks on a full pipe.
        let stdout = drain(child.stdout.take());
        let stderr = drain(child.stderr.take());

        let deadline = self.timeout.map(|limit| Instant::now() + limit);

        // Drain threads of a killed process are left detached: anything that
        // inherited the pipes may keep them open past the deadline.
        let status = loop {
            if let Some(status) = child.try_wait()? {
                break status;
            }
            if deadline.is_some_and(|d| Instant::now() >= d) {
                kill(&mut child);
                return Ok(Outcome::TimedOut);
            }
            if self.cancel.is_some_and(|cancelled| cancelled()) {
                kill(&mut child);
                return Ok(Outcome::Cancelled);
            }
            thread::sleep(POLL_INTERVAL);
        };

        Ok(Outcome::Exited(Finished {
            status,
            stdout: join(stdout),
            stderr: join(stderr),
        }))
    }
}

fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> Option<JoinHandle<Vec<u8>>> {
    pipe.map(|mut pipe| {
        thread::spawn(move || {
            let mut buf = Vec::new();
            let _ = pipe.read_to_end(&mut buf);
            buf
        })
    })
}

fn join(handle: Option<JoinHandle<Vec<u8>>>) -> Vec<u8> {
    handle
        .and_then(|h| h.join().ok())
        .unwrap_or_default()
}

/// Kill the child's whole process group, then reap the child.
fn kill(child: &mut Child) {
    #[cfg(unix)]
    if let Ok(pgid) = libc::pid_t::try_from(child.id()) {
        // The child leads its own group (pgid == pid).
        unsafe { libc::kill(-pgid, libc::SIGKILL) };
    }
    let _ = child.kill();
    let _ = child.wait();
}
