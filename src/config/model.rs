// src/config/model.rs

use std::time::Duration;

use serde::Deserialize;

/// Configuration as read from a TOML file, before validation.
///
/// ```toml
/// [exec]
/// timeout = "30s"
///
/// [shell]
/// program = "sh"
///
/// [remote]
/// ssh = "ssh"
/// login_command = "sh -il"
/// rsync = "rsync"
/// rsync_flags = ["-acrv"]
/// rsh = "ssh"
/// ```
///
/// All sections are optional and have reasonable defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawConfigFile {
    /// Executor-wide settings from `[exec]`.
    #[serde(default)]
    pub exec: ExecSection,

    /// Local command interpreter from `[shell]`.
    #[serde(default)]
    pub shell: ShellSection,

    /// Remote-login and directory-sync tools from `[remote]`.
    #[serde(default)]
    pub remote: RemoteSection,
}

/// `[exec]` section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExecSection {
    /// Default timeout for every invocation, e.g. `"250ms"`, `"30s"`, `"5m"`.
    ///
    /// Unset means invocations run until the child exits.
    #[serde(default)]
    pub timeout: Option<String>,
}

/// `[shell]` section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ShellSection {
    /// Interpreter that reads a script on its standard input.
    #[serde(default = "default_shell_program")]
    pub program: String,
}

fn default_shell_program() -> String {
    "sh".to_string()
}

impl Default for ShellSection {
    fn default() -> Self {
        Self {
            program: default_shell_program(),
        }
    }
}

/// `[remote]` section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RemoteSection {
    /// Remote-login client, invoked as `<ssh> <host> <login_command>`.
    #[serde(default = "default_ssh")]
    pub ssh: String,

    /// Command line the remote side starts; the payload is fed to it.
    #[serde(default = "default_login_command")]
    pub login_command: String,

    /// Recursive file-synchronization tool.
    #[serde(default = "default_rsync")]
    pub rsync: String,

    /// Archive/recurse/verbose flags passed before the paths.
    #[serde(default = "default_rsync_flags")]
    pub rsync_flags: Vec<String>,

    /// Remote shell used by the sync tool, passed as `--rsh=<rsh>`.
    #[serde(default = "default_rsh")]
    pub rsh: String,
}

fn default_ssh() -> String {
    "ssh".to_string()
}

fn default_login_command() -> String {
    "sh -il".to_string()
}

fn default_rsync() -> String {
    "rsync".to_string()
}

fn default_rsync_flags() -> Vec<String> {
    vec!["-acrv".to_string()]
}

fn default_rsh() -> String {
    "ssh".to_string()
}

impl Default for RemoteSection {
    fn default() -> Self {
        Self {
            ssh: default_ssh(),
            login_command: default_login_command(),
            rsync: default_rsync(),
            rsync_flags: default_rsync_flags(),
            rsh: default_rsh(),
        }
    }
}

/// Validated configuration.
///
/// Only obtainable through `ConfigFile::try_from(RawConfigFile)` (see
/// `validate.rs`) or `Default`, so every program name is non-empty and the
/// timeout has already been parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigFile {
    pub timeout: Option<Duration>,
    pub shell: ShellSection,
    pub remote: RemoteSection,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(
        timeout: Option<Duration>,
        shell: ShellSection,
        remote: RemoteSection,
    ) -> Self {
        Self {
            timeout,
            shell,
            remote,
        }
    }
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self::new_unchecked(None, ShellSection::default(), RemoteSection::default())
    }
}
