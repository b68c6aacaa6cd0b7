// src/lib.rs

pub mod cli;
pub mod config;
pub mod errors;
pub mod exec;
pub mod logging;
pub mod remote;
pub mod shell;
pub mod types;

use anyhow::{Context, Result};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tracing::debug;

use crate::cli::{CliArgs, CliCommand};
use crate::config::load_or_default;
use crate::exec::{ExecutionResult, Executor, Invocation, ProcessExecutor};
use crate::remote::RemoteExecutor;
use crate::shell::ShellRunner;

pub use crate::exec::{execute, Outcome};
pub use crate::shell::run_shell;

/// High-level entry point used by `main.rs`.
///
/// Loads the config, runs the requested operation and returns the exit code
/// the binary should terminate with:
/// - `exec` / `shell` / `remote-shell`: the child's own exit code;
/// - `download` / `upload`: `0` on success.
pub async fn run(args: CliArgs) -> Result<i32> {
    let cfg = load_or_default(args.config.as_deref())?;
    debug!(?cfg, "configuration loaded");

    match args.command {
        CliCommand::Exec {
            dir,
            timeout,
            program,
            args,
        } => {
            let mut invocation = Invocation::new(program)
                .args(args)
                .stdin(read_payload().await?);
            if let Some(dir) = dir {
                invocation = invocation.dir(dir);
            }
            if let Some(timeout) = timeout {
                invocation = invocation.timeout(timeout);
            }

            let executor = ProcessExecutor::new().with_default_timeout(cfg.timeout);
            let result = executor.execute(&invocation).await;
            forward(result, invocation.program()).await
        }

        CliCommand::Shell => {
            let script = read_payload().await?;
            let runner = ShellRunner::from_config(&cfg);
            let result = runner.run_shell(&script).await;
            forward(result, &cfg.shell.program).await
        }

        CliCommand::RemoteShell { host } => {
            let command = read_payload().await?;
            let remote = RemoteExecutor::from_config(&cfg);
            let result = remote.run_remote_shell(&host, &command).await;
            forward(result, &cfg.remote.ssh).await
        }

        CliCommand::Download {
            host,
            remote_dir,
            local_dir,
        } => {
            RemoteExecutor::from_config(&cfg)
                .download_directory(&host, &remote_dir, &local_dir)
                .await
                .with_context(|| format!("downloading {}:{} to {}", host, remote_dir, local_dir))?;
            Ok(0)
        }

        CliCommand::Upload {
            host,
            local_dir,
            remote_dir,
        } => {
            RemoteExecutor::from_config(&cfg)
                .upload_directory(&host, &local_dir, &remote_dir)
                .await
                .with_context(|| format!("uploading {} to {}:{}", local_dir, host, remote_dir))?;
            Ok(0)
        }
    }
}

async fn read_payload() -> Result<Vec<u8>> {
    let mut payload = Vec::new();
    tokio::io::stdin()
        .read_to_end(&mut payload)
        .await
        .context("reading input payload from stdin")?;
    Ok(payload)
}

/// Copy the child's output bytes to our own streams and pick our exit code.
async fn forward(result: ExecutionResult, program: &str) -> Result<i32> {
    let mut stdout = tokio::io::stdout();
    stdout.write_all(&result.stdout).await?;
    stdout.flush().await?;

    let mut stderr = tokio::io::stderr();
    stderr.write_all(&result.stderr).await?;
    stderr.flush().await?;

    match result.exit_code() {
        Some(code) => Ok(code),
        None => {
            result.ensure_success(program)?;
            Ok(0)
        }
    }
}
