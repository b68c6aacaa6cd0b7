// src/config/validate.rs

use crate::config::duration::parse_duration;
use crate::config::model::{ConfigFile, RawConfigFile, RemoteSection};
use crate::errors::{PosixkitError, Result};

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = PosixkitError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_config(&raw)?;
        let timeout = parse_timeout(raw.exec.timeout.as_deref())?;
        Ok(ConfigFile::new_unchecked(timeout, raw.shell, raw.remote))
    }
}

fn validate_raw_config(cfg: &RawConfigFile) -> Result<()> {
    ensure_program("[shell].program", &cfg.shell.program)?;
    validate_remote(&cfg.remote)?;
    Ok(())
}

fn validate_remote(remote: &RemoteSection) -> Result<()> {
    ensure_program("[remote].ssh", &remote.ssh)?;
    ensure_program("[remote].rsync", &remote.rsync)?;

    if remote.login_command.trim().is_empty() {
        return Err(PosixkitError::ConfigError(
            "[remote].login_command must not be empty".to_string(),
        ));
    }
    if remote.rsh.trim().is_empty() {
        return Err(PosixkitError::ConfigError(
            "[remote].rsh must not be empty".to_string(),
        ));
    }
    if let Some(flag) = remote.rsync_flags.iter().find(|f| f.trim().is_empty()) {
        return Err(PosixkitError::ConfigError(format!(
            "[remote].rsync_flags contains an empty flag ({:?})",
            flag
        )));
    }

    Ok(())
}

fn ensure_program(key: &str, program: &str) -> Result<()> {
    if program.trim().is_empty() {
        return Err(PosixkitError::ConfigError(format!(
            "{} must name a program (got an empty string)",
            key
        )));
    }
    Ok(())
}

fn parse_timeout(raw: Option<&str>) -> Result<Option<std::time::Duration>> {
    let Some(raw) = raw else {
        return Ok(None);
    };

    let timeout = parse_duration(raw)
        .map_err(|e| PosixkitError::ConfigError(format!("[exec].timeout: {}", e)))?;

    if timeout.is_zero() {
        return Err(PosixkitError::ConfigError(
            "[exec].timeout must be greater than zero".to_string(),
        ));
    }

    Ok(Some(timeout))
}
