// src/errors.rs

//! Crate-wide error aliases and helpers.

use std::time::Duration;

use thiserror::Error;

use crate::types::PipeStage;

#[derive(Error, Debug)]
pub enum PosixkitError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("failed to start '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O failure on {stage} of '{program}': {source}")]
    Pipe {
        program: String,
        stage: PipeStage,
        #[source]
        source: std::io::Error,
    },

    #[error("'{program}' exited with status {code}: {stderr}")]
    NonZeroExit {
        program: String,
        code: i32,
        stderr: String,
    },

    #[error("'{program}' was terminated by signal {signal}")]
    Signaled { program: String, signal: i32 },

    #[error("'{program}' timed out after {after:?}")]
    TimedOut { program: String, after: Duration },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, PosixkitError>;
