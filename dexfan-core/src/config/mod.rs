//! Configuration types for DexFan
//!
//! Configuration is a single [`PluginConfig`] read from a TOML file when the
//! plugin is constructed. The device endpoint and line settings are fixed
//! (see [`crate::device`]) and are not part of it.
//!
//! ```toml
//! [link]
//! timeout_ms = 1000
//!
//! [reconnect]
//! enabled = false
//! max_attempts = 0
//! initial_delay_ms = 1000
//! max_delay_ms = 30000
//! backoff_multiplier = 2.0
//! ```

mod paths;
mod plugin_config;

pub use paths::default_config_path;
pub use plugin_config::{LinkConfig, PluginConfig, ReconnectConfig};
