// src/exec/invocation.rs

//! The immutable description of one external program run.

use std::path::{Path, PathBuf};
use std::time::Duration;

/// Everything the executor needs to run a program once.
///
/// Built with the consuming builder methods below; once handed to
/// [`crate::exec::execute`] it is only ever read.
///
/// ```
/// use posixkit::exec::Invocation;
///
/// let inv = Invocation::new("cat").stdin("hello\n");
/// assert_eq!(inv.stdin_bytes(), b"hello\n");
/// assert!(inv.working_dir().is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    program: String,
    dir: Option<PathBuf>,
    args: Vec<String>,
    stdin: Vec<u8>,
    timeout: Option<Duration>,
}

impl Invocation {
    /// Start describing a run of `program`, resolved via `PATH` unless it
    /// contains a path separator.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            dir: None,
            args: Vec::new(),
            stdin: Vec::new(),
            timeout: None,
        }
    }

    /// Working directory for the child.
    ///
    /// An empty path means "inherit the caller's", same as never calling this.
    pub fn dir(mut self, dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        self.dir = if dir.as_os_str().is_empty() {
            None
        } else {
            Some(dir.to_path_buf())
        };
        self
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Payload written to the child's standard input before it is closed.
    pub fn stdin(mut self, payload: impl Into<Vec<u8>>) -> Self {
        self.stdin = payload.into();
        self
    }

    /// Kill the child and report a timeout if it has not finished by then.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn working_dir(&self) -> Option<&Path> {
        self.dir.as_deref()
    }

    pub fn arguments(&self) -> &[String] {
        &self.args
    }

    pub fn stdin_bytes(&self) -> &[u8] {
        &self.stdin
    }

    pub fn timeout_after(&self) -> Option<Duration> {
        self.timeout
    }
}
