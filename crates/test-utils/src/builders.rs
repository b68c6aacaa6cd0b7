#![allow(dead_code)]

use posixkit::config::{ConfigFile, RawConfigFile};

/// Builder for `ConfigFile` to simplify test setup.
///
/// Goes through the same `TryFrom<RawConfigFile>` validation as a config
/// file on disk.
pub struct ConfigFileBuilder {
    config: RawConfigFile,
}

impl ConfigFileBuilder {
    pub fn new() -> Self {
        Self {
            config: RawConfigFile::default(),
        }
    }

    pub fn timeout(mut self, timeout: &str) -> Self {
        self.config.exec.timeout = Some(timeout.to_string());
        self
    }

    pub fn shell(mut self, program: &str) -> Self {
        self.config.shell.program = program.to_string();
        self
    }

    pub fn ssh(mut self, program: &str) -> Self {
        self.config.remote.ssh = program.to_string();
        self
    }

    pub fn login_command(mut self, command: &str) -> Self {
        self.config.remote.login_command = command.to_string();
        self
    }

    pub fn rsync(mut self, program: &str) -> Self {
        self.config.remote.rsync = program.to_string();
        self
    }

    pub fn rsync_flags(mut self, flags: &[&str]) -> Self {
        self.config.remote.rsync_flags = flags.iter().map(|f| f.to_string()).collect();
        self
    }

    pub fn rsh(mut self, rsh: &str) -> Self {
        self.config.remote.rsh = rsh.to_string();
        self
    }

    pub fn raw(self) -> RawConfigFile {
        self.config
    }

    pub fn build(self) -> ConfigFile {
        ConfigFile::try_from(self.config).expect("Failed to build valid config from builder")
    }
}

impl Default for ConfigFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}
