// src/exec/result.rs

//! What an invocation hands back to its caller.

use std::borrow::Cow;
use std::io;
use std::time::Duration;

use crate::errors::{PosixkitError, Result};
use crate::types::PipeStage;

/// How an invocation ended.
///
/// A non-zero `Exited` code is a normal, reportable outcome: the child ran
/// and signalled failure. Only `StartFailed` and `IoFailed` describe faults
/// in the execution itself.
#[derive(Debug)]
pub enum Outcome {
    /// The child exited on its own with this status code.
    Exited(i32),
    /// The child was terminated by this signal (unix only).
    Signaled(i32),
    /// The process could not be created (missing executable, bad working
    /// directory, permission denied, ...). No stream was ever attached.
    StartFailed(io::Error),
    /// Writing input, draining output, or reaping the child failed.
    IoFailed { stage: PipeStage, source: io::Error },
    /// The invocation's timeout elapsed; the child was killed and reaped.
    TimedOut(Duration),
}

impl Outcome {
    pub fn success(&self) -> bool {
        matches!(self, Outcome::Exited(0))
    }

    /// Exit code, if the child exited on its own.
    pub fn code(&self) -> Option<i32> {
        match self {
            Outcome::Exited(code) => Some(*code),
            _ => None,
        }
    }
}

/// Collected output of one invocation.
///
/// `stdout` and `stderr` are the exact bytes the child wrote before the
/// invocation ended, even when the outcome is a failure. Use
/// [`stdout_text`](Self::stdout_text) / [`stderr_text`](Self::stderr_text)
/// for a UTF-8 view.
#[derive(Debug)]
pub struct ExecutionResult {
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
    pub outcome: Outcome,
}

impl ExecutionResult {
    pub fn new(stdout: Vec<u8>, stderr: Vec<u8>, outcome: Outcome) -> Self {
        Self {
            stdout,
            stderr,
            outcome,
        }
    }

    pub(crate) fn start_failed(source: io::Error) -> Self {
        Self::new(Vec::new(), Vec::new(), Outcome::StartFailed(source))
    }

    /// Stdout decoded as UTF-8, invalid sequences replaced.
    pub fn stdout_text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.stdout)
    }

    /// Stderr decoded as UTF-8, invalid sequences replaced.
    pub fn stderr_text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.stderr)
    }

    pub fn success(&self) -> bool {
        self.outcome.success()
    }

    pub fn exit_code(&self) -> Option<i32> {
        self.outcome.code()
    }

    /// Turn any non-success outcome into a [`PosixkitError`] naming `program`.
    ///
    /// A non-zero exit carries the collected stderr text.
    pub fn ensure_success(self, program: &str) -> Result<Self> {
        let program = program.to_string();
        match self.outcome {
            Outcome::Exited(0) => Ok(self),
            Outcome::Exited(code) => Err(PosixkitError::NonZeroExit {
                program,
                code,
                stderr: String::from_utf8_lossy(&self.stderr).into_owned(),
            }),
            Outcome::Signaled(signal) => Err(PosixkitError::Signaled { program, signal }),
            Outcome::StartFailed(source) => Err(PosixkitError::Spawn { program, source }),
            Outcome::IoFailed { stage, source } => Err(PosixkitError::Pipe {
                program,
                stage,
                source,
            }),
            Outcome::TimedOut(after) => Err(PosixkitError::TimedOut { program, after }),
        }
    }
}
