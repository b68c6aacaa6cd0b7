// src/shell.rs

//! Local shell runner: a script body piped into a command interpreter.

use tracing::debug;

use crate::config::{ConfigFile, ShellSection};
use crate::exec::{ExecutionResult, Executor, Invocation, ProcessExecutor};

/// Runs scripts through the configured interpreter (`sh` by default).
#[derive(Debug, Clone)]
pub struct ShellRunner<E = ProcessExecutor> {
    executor: E,
    program: String,
}

impl ShellRunner<ProcessExecutor> {
    /// `sh` with no timeout.
    pub fn new() -> Self {
        Self::with_executor(ProcessExecutor::new(), &ShellSection::default())
    }

    pub fn from_config(cfg: &ConfigFile) -> Self {
        let executor = ProcessExecutor::new().with_default_timeout(cfg.timeout);
        Self::with_executor(executor, &cfg.shell)
    }
}

impl Default for ShellRunner<ProcessExecutor> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Executor> ShellRunner<E> {
    pub fn with_executor(executor: E, shell: &ShellSection) -> Self {
        Self {
            executor,
            program: shell.program.clone(),
        }
    }

    /// The interpreter with no arguments, inheriting our working directory,
    /// and `script` as its standard input, byte for byte.
    pub fn invocation(&self, script: impl AsRef<[u8]>) -> Invocation {
        Invocation::new(self.program.as_str()).stdin(script.as_ref())
    }

    pub async fn run_shell(&self, script: impl AsRef<[u8]>) -> ExecutionResult {
        let script = script.as_ref();
        debug!(shell = %self.program, script_bytes = script.len(), "running local shell script");
        let invocation = self.invocation(script);
        self.executor.execute(&invocation).await
    }
}

/// Run `script` with `sh` using the default executor.
pub async fn run_shell(script: impl AsRef<[u8]>) -> ExecutionResult {
    ShellRunner::new().run_shell(script).await
}
