// src/exec/backend.rs

//! Pluggable executor backend abstraction.
//!
//! The shell and remote layers talk to an [`Executor`] instead of spawning
//! processes themselves. Production code uses [`ProcessExecutor`]; tests can
//! swap in a fake that records the invocations it was handed and replies
//! with a canned [`ExecutionResult`].

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use crate::exec::invocation::Invocation;
use crate::exec::process;
use crate::exec::result::ExecutionResult;

/// Trait abstracting how an [`Invocation`] gets run.
pub trait Executor: Send + Sync {
    fn execute<'a>(
        &'a self,
        invocation: &'a Invocation,
    ) -> Pin<Box<dyn Future<Output = ExecutionResult> + Send + 'a>>;
}

/// Real executor backend: spawns one OS process per call.
///
/// Holds no per-invocation state, so a single value can be shared by any
/// number of concurrent callers.
#[derive(Debug, Clone, Default)]
pub struct ProcessExecutor {
    default_timeout: Option<Duration>,
}

impl ProcessExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Timeout applied to invocations that don't carry their own.
    pub fn with_default_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.default_timeout = timeout;
        self
    }

    pub fn default_timeout(&self) -> Option<Duration> {
        self.default_timeout
    }
}

impl Executor for ProcessExecutor {
    fn execute<'a>(
        &'a self,
        invocation: &'a Invocation,
    ) -> Pin<Box<dyn Future<Output = ExecutionResult> + Send + 'a>> {
        let timeout = invocation.timeout_after().or(self.default_timeout);
        Box::pin(process::run(invocation, timeout))
    }
}
