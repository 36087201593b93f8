//! Plugin configuration loaded once at construction
//!
//! Every section and field is optional; missing values take their defaults.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::debug;

use crate::device::{DefaultDevice, DeviceConfig};
use crate::{DexFanError, Result};

/// Serial link settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkConfig {
    /// Bound on a single write or read, in milliseconds
    pub timeout_ms: u64,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            timeout_ms: DefaultDevice::DEFAULT_TIMEOUT_MS,
        }
    }
}

impl LinkConfig {
    /// Timeout as a `Duration`
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Automatic reopen after the link is lost
///
/// Disabled by default: a lost link then stays closed until the host calls
/// `initialize()` again.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconnectConfig {
    /// Attempt to reopen a closed link from `update()`
    pub enabled: bool,
    /// Consecutive failed attempts before giving up (0 = unlimited)
    pub max_attempts: u32,
    /// Delay before the first reopen attempt, in milliseconds
    pub initial_delay_ms: u64,
    /// Upper bound on the delay between attempts, in milliseconds
    pub max_delay_ms: u64,
    /// Factor applied to the delay after each failed attempt
    pub backoff_multiplier: f64,
}

impl Default for ReconnectConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            max_attempts: 0,
            initial_delay_ms: 1000,
            max_delay_ms: 30_000,
            backoff_multiplier: 2.0,
        }
    }
}

/// Configuration for the DexFan plugin.
///
/// Located at `~/.config/dexfan/plugin.toml` by default.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PluginConfig {
    /// Serial link settings
    pub link: LinkConfig,

    /// Reopen behaviour after a disconnect
    pub reconnect: ReconnectConfig,
}

impl PluginConfig {
    /// Parse PluginConfig from TOML string.
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize PluginConfig to TOML string.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| DexFanError::Config(e.to_string()))
    }

    /// Load configuration from `path`, or defaults if the file does not exist.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(
                "No configuration at {}, using defaults",
                path.display()
            );
            return Ok(Self::default());
        }

        debug!("Loading configuration from {}", path.display());
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Check value ranges that serde cannot express
    pub fn validate(&self) -> Result<()> {
        if self.link.timeout_ms == 0 {
            return Err(DexFanError::Config(
                "link.timeout_ms must be greater than 0".to_string(),
            ));
        }
        if self.reconnect.backoff_multiplier < 1.0 {
            return Err(DexFanError::Config(format!(
                "reconnect.backoff_multiplier must be at least 1.0, got {}",
                self.reconnect.backoff_multiplier
            )));
        }
        if self.reconnect.initial_delay_ms > self.reconnect.max_delay_ms {
            return Err(DexFanError::Config(format!(
                "reconnect.initial_delay_ms ({}) exceeds reconnect.max_delay_ms ({})",
                self.reconnect.initial_delay_ms, self.reconnect.max_delay_ms
            )));
        }
        Ok(())
    }
}
