// src/logging.rs

//! Diagnostics for the `posixkit` binary.
//!
//! Child stderr is forwarded byte-for-byte to our own stderr, and our log
//! lines go there too. The filter therefore defaults to `warn`, so a quiet
//! run leaves the child's diagnostics readable.
//!
//! Filter selection, first match wins:
//! - `--log-level <LEVEL>` applies one level to every target;
//! - `POSIXKIT_LOG` takes full `EnvFilter` directives, e.g.
//!   `posixkit::exec=debug,warn`;
//! - otherwise `warn`.

use anyhow::{anyhow, Result};
use tracing_subscriber::{fmt, EnvFilter};

use crate::cli::LogLevel;

pub const LOG_ENV: &str = "POSIXKIT_LOG";

const DEFAULT_DIRECTIVE: &str = "warn";

/// Install the process-wide subscriber. Fails if one is already set.
pub fn init_logging(cli_level: Option<LogLevel>) -> Result<()> {
    let filter = build_filter(cli_level, std::env::var(LOG_ENV).ok().as_deref());

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow!("installing log subscriber: {e}"))
}

/// Pick the directive string: flag, then env value, then the default.
/// An env value that does not parse falls back to the default.
fn directive_for(cli_level: Option<LogLevel>, env_value: Option<&str>) -> String {
    if let Some(level) = cli_level {
        return level_name(level).to_string();
    }
    match env_value.map(str::trim) {
        Some(v) if !v.is_empty() && EnvFilter::try_new(v).is_ok() => v.to_string(),
        _ => DEFAULT_DIRECTIVE.to_string(),
    }
}

fn build_filter(cli_level: Option<LogLevel>, env_value: Option<&str>) -> EnvFilter {
    EnvFilter::new(directive_for(cli_level, env_value))
}

fn level_name(level: LogLevel) -> &'static str {
    match level {
        LogLevel::Error => "error",
        LogLevel::Warn => "warn",
        LogLevel::Info => "info",
        LogLevel::Debug => "debug",
        LogLevel::Trace => "trace",
    }
}
