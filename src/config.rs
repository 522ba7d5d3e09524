//! Configuration management for the RAX FTP client
//!
//! Loads client tuning from an optional `config.toml` with `RAX_FTPC_*`
//! environment overrides. Every key has a built-in default.

use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// Which address to dial for a passive data connection.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum PassiveAddressPolicy {
    /// Reuse the control connection's host and take only the port from the
    /// 227 reply. Tolerates servers that advertise internal addresses.
    #[default]
    ControlHost,
    /// Dial the address the server advertised in the 227 reply.
    Advertised,
}

/// Client configuration
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ClientConfig {
    /// Buffer size for data channel streaming
    pub buffer_size: usize,

    /// Maximum number of lines accumulated into one multi-line reply
    pub max_reply_lines: usize,

    /// Read/write timeout for control and data sockets; 0 disables it
    pub io_timeout_secs: u64,

    /// Address selection for passive data connections
    pub passive_address: PassiveAddressPolicy,

    /// Extension appended to a download while it is in progress
    pub temp_suffix: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            buffer_size: 8192,
            max_reply_lines: 1024,
            io_timeout_secs: 0,
            passive_address: PassiveAddressPolicy::ControlHost,
            temp_suffix: "tmp".to_string(),
        }
    }
}

impl ClientConfig {
    /// Load configuration from config.toml with environment overrides.
    ///
    /// Missing files are not an error; defaults fill any unset key.
    pub fn load() -> Result<Self, config::ConfigError> {
        let config_paths = ["rax-ftp-client/config", "config"];

        let mut builder = Config::builder();
        for config_path in config_paths {
            if Path::new(&format!("{config_path}.toml")).exists() {
                builder = builder.add_source(File::with_name(config_path));
                break;
            }
        }

        let settings = builder
            .add_source(Environment::with_prefix("RAX_FTPC"))
            .build()?;
        let config: ClientConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from an explicit file (format inferred from extension)
    pub fn from_file(path: &Path) -> Result<Self, config::ConfigError> {
        let settings = Config::builder().add_source(File::from(path)).build()?;
        let config: ClientConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validation for all configuration values
    pub fn validate(&self) -> Result<(), config::ConfigError> {
        if self.buffer_size == 0 {
            return Err(config::ConfigError::Message(
                "buffer_size must be greater than 0".into(),
            ));
        }

        if self.max_reply_lines == 0 {
            return Err(config::ConfigError::Message(
                "max_reply_lines must be greater than 0".into(),
            ));
        }

        if self.temp_suffix.is_empty() || self.temp_suffix.contains(['/', '\\']) {
            return Err(config::ConfigError::Message(
                "temp_suffix must be a non-empty file extension".into(),
            ));
        }

        Ok(())
    }

    /// Get the socket I/O timeout, if one is configured
    pub fn io_timeout(&self) -> Option<Duration> {
        match self.io_timeout_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }
}
