//! Client configuration

use std::time::Duration;

use dt435_core::constants::{DEFAULT_COMMAND_TIMEOUT, DEFAULT_PORT, DEFAULT_TIMEOUT};

use crate::error::{Error, Result};

/// Environment variable holding the concentrator host
pub const ENV_HOST: &str = "DT435_HOST";

/// Environment variable holding the concentrator port
pub const ENV_PORT: &str = "DT435_PORT";

/// Environment variable holding the per-command timeout in milliseconds
pub const ENV_TIMEOUT_MS: &str = "DT435_TIMEOUT_MS";

/// Environment variable enabling inbound checksum verification
pub const ENV_VERIFY_CHECKSUM: &str = "DT435_VERIFY_CHECKSUM";

/// Connection settings for a [`Dispenser`](crate::Dispenser)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub host: String,
    pub port: u16,

    /// TCP dial timeout
    pub connect_timeout: Duration,

    /// Write plus read deadline of one command
    pub command_timeout: Duration,

    /// Verify the checksum of checksummed replies
    pub verify_checksums: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: DEFAULT_PORT,
            connect_timeout: Duration::from_secs(DEFAULT_TIMEOUT),
            command_timeout: Duration::from_secs(DEFAULT_COMMAND_TIMEOUT),
            verify_checksums: false,
        }
    }
}

impl Config {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Self::default()
        }
    }

    /// Load settings from `DT435_*` environment variables
    ///
    /// Unset variables keep their defaults.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(host) = lookup(ENV_HOST) {
            config.host = host;
        }

        if let Some(port) = lookup(ENV_PORT) {
            config.port = port
                .parse()
                .map_err(|e| Error::Config(format!("{}={:?}: {}", ENV_PORT, port, e)))?;
        }

        if let Some(millis) = lookup(ENV_TIMEOUT_MS) {
            let millis: u64 = millis
                .parse()
                .map_err(|e| Error::Config(format!("{}={:?}: {}", ENV_TIMEOUT_MS, millis, e)))?;
            config.command_timeout = Duration::from_millis(millis);
        }

        if let Some(flag) = lookup(ENV_VERIFY_CHECKSUM) {
            config.verify_checksums = match flag.to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => true,
                "0" | "false" | "no" | "off" | "" => false,
                _ => {
                    return Err(Error::Config(format!(
                        "{}={:?}: expected a boolean",
                        ENV_VERIFY_CHECKSUM, flag
                    )));
                }
            };
        }

        Ok(config)
    }
}
