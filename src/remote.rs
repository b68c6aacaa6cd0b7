// src/remote.rs

//! Remote execution over a login client, plus directory mirroring.
//!
//! Both are pure call patterns on top of an [`Executor`]:
//!
//! - remote shell: `ssh <host> "sh -il"` with the command text on stdin;
//! - download / upload: `rsync -acrv --rsh=ssh <src>/ <dst>/`, where exactly
//!   one side is prefixed with `<host>:`.

use tracing::{debug, info};

use crate::config::{ConfigFile, RemoteSection};
use crate::errors::Result;
use crate::exec::{ExecutionResult, Executor, Invocation, ProcessExecutor};

#[derive(Debug, Clone)]
pub struct RemoteExecutor<E = ProcessExecutor> {
    executor: E,
    settings: RemoteSection,
}

impl RemoteExecutor<ProcessExecutor> {
    /// `ssh` / `rsync` with their default flags and no timeout.
    pub fn new() -> Self {
        Self::with_executor(ProcessExecutor::new(), RemoteSection::default())
    }

    pub fn from_config(cfg: &ConfigFile) -> Self {
        let executor = ProcessExecutor::new().with_default_timeout(cfg.timeout);
        Self::with_executor(executor, cfg.remote.clone())
    }
}

impl Default for RemoteExecutor<ProcessExecutor> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Executor> RemoteExecutor<E> {
    pub fn with_executor(executor: E, settings: RemoteSection) -> Self {
        Self { executor, settings }
    }

    pub fn remote_shell_invocation(&self, host: &str, command: impl AsRef<[u8]>) -> Invocation {
        Invocation::new(self.settings.ssh.as_str())
            .arg(host)
            .arg(self.settings.login_command.as_str())
            .stdin(command.as_ref())
    }

    pub fn download_invocation(&self, host: &str, remote_dir: &str, local_dir: &str) -> Invocation {
        let source = format!("{}:{}", host, with_trailing_slash(remote_dir));
        let dest = with_trailing_slash(local_dir);
        self.mirror_invocation(source, dest)
    }

    pub fn upload_invocation(&self, host: &str, local_dir: &str, remote_dir: &str) -> Invocation {
        let source = with_trailing_slash(local_dir);
        let dest = format!("{}:{}", host, with_trailing_slash(remote_dir));
        self.mirror_invocation(source, dest)
    }

    fn mirror_invocation(&self, source: String, dest: String) -> Invocation {
        Invocation::new(self.settings.rsync.as_str())
            .args(self.settings.rsync_flags.iter().cloned())
            .arg(format!("--rsh={}", self.settings.rsh))
            .arg(source)
            .arg(dest)
    }

    /// Run `command` through a login shell on `host`.
    pub async fn run_remote_shell(&self, host: &str, command: impl AsRef<[u8]>) -> ExecutionResult {
        let command = command.as_ref();
        debug!(host, command_bytes = command.len(), "running remote shell");
        let invocation = self.remote_shell_invocation(host, command);
        self.executor.execute(&invocation).await
    }

    /// Mirror `remote_dir` on `host` into `local_dir`.
    pub async fn download_directory(
        &self,
        host: &str,
        remote_dir: &str,
        local_dir: &str,
    ) -> Result<()> {
        info!(host, remote_dir, local_dir, "downloading directory");
        let invocation = self.download_invocation(host, remote_dir, local_dir);
        self.mirror(&invocation).await
    }

    /// Mirror `local_dir` into `remote_dir` on `host`.
    ///
    /// `remote_dir` must already exist on the remote host.
    pub async fn upload_directory(
        &self,
        host: &str,
        local_dir: &str,
        remote_dir: &str,
    ) -> Result<()> {
        info!(host, local_dir, remote_dir, "uploading directory");
        let invocation = self.upload_invocation(host, local_dir, remote_dir);
        self.mirror(&invocation).await
    }

    async fn mirror(&self, invocation: &Invocation) -> Result<()> {
        self.executor
            .execute(invocation)
            .await
            .ensure_success(invocation.program())?;
        Ok(())
    }
}

fn with_trailing_slash(path: &str) -> String {
    if path.ends_with('/') {
        path.to_string()
    } else {
        format!("{}/", path)
    }
}
