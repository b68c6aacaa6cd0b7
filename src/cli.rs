// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand, ValueEnum};

use crate::config::parse_duration;

/// Command-line arguments for `posixkit`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "posixkit",
    version,
    about = "Run external programs locally or over ssh, fully draining their output.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the config file (TOML).
    ///
    /// Default: `Posixkit.toml` in the current working directory if it
    /// exists, built-in defaults otherwise.
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `POSIXKIT_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL", global = true)]
    pub log_level: Option<LogLevel>,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Clone, Subcommand)]
pub enum CliCommand {
    /// Run PROGRAM with ARGS, feeding it this process's stdin.
    Exec {
        /// Working directory for the program.
        #[arg(long, value_name = "DIR")]
        dir: Option<PathBuf>,

        /// Kill the program after this long (e.g. 500ms, 30s, 5m).
        #[arg(long, value_name = "DURATION", value_parser = parse_duration)]
        timeout: Option<Duration>,

        program: String,

        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },

    /// Run the script read from stdin with the local shell.
    Shell,

    /// Run the commands read from stdin in a login shell on HOST.
    RemoteShell { host: String },

    /// Copy REMOTE_DIR on HOST into LOCAL_DIR.
    Download {
        host: String,
        remote_dir: String,
        local_dir: String,
    },

    /// Copy LOCAL_DIR into the existing REMOTE_DIR on HOST.
    Upload {
        host: String,
        local_dir: String,
        remote_dir: String,
    },
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
