//! DexFan Core Library
//!
//! Shared types, host-facing interfaces, and configuration for the DexFan
//! water sensor plugin. Used by both the hardware and plugin crates.

pub mod config;
pub mod device;
pub mod error;
pub mod host;
pub mod types;

// Re-export commonly used types
pub use config::{default_config_path, LinkConfig, PluginConfig, ReconnectConfig};
pub use device::*;
pub use error::*;
pub use host::{Plugin, PluginLogger, PluginSensor, SensorContainer};
pub use types::*;
