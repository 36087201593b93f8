//! Device definitions
//!
//! The probe is reached at a fixed endpoint with fixed line settings. These
//! values are compile-time properties of the device, not configuration.
//!
//! Note: Actual serial I/O is in the `dexfan-hardware` crate. This module only
//! contains device specifications.

/// Serial probe device trait
///
/// Each probe variant implements this trait to define its endpoint,
/// line settings, and query protocol.
///
/// # Example
///
/// ```
/// use dexfan_core::device::{DeviceConfig, DexWaterProbe};
///
/// const PATH: &str = DexWaterProbe::DEVICE_PATH;
/// const BAUD: u32 = DexWaterProbe::BAUD_RATE;
/// ```
pub trait DeviceConfig: Send + Sync + 'static {
    /// Human-readable device name
    const NAME: &'static str;

    /// Fixed serial endpoint the probe is attached to
    const DEVICE_PATH: &'static str;

    /// Serial communication baud rate
    const BAUD_RATE: u32;

    /// Default bound on one write/read exchange, in milliseconds
    const DEFAULT_TIMEOUT_MS: u64;

    /// Query token sent to request a temperature reading
    const QUERY_TOKEN: &'static str;

    /// Line terminator appended to every request
    const LINE_TERMINATOR: &'static str;
}

/// DexFan water-temperature probe
///
/// - Fixed endpoint `COM14`
/// - 9600 baud, 8N1, no flow control
/// - Query `t\n`, reply is one base-10 integer line (degrees Celsius)
pub struct DexWaterProbe;

impl DeviceConfig for DexWaterProbe {
    const NAME: &'static str = "DexFan Water Probe";
    const DEVICE_PATH: &'static str = "COM14";
    const BAUD_RATE: u32 = 9600;
    const DEFAULT_TIMEOUT_MS: u64 = 1000;
    const QUERY_TOKEN: &'static str = "t";
    const LINE_TERMINATOR: &'static str = "\n";
}

/// Default device used throughout the plugin
pub type DefaultDevice = DexWaterProbe;

/// Name the plugin reports to the host
pub const PLUGIN_NAME: &str = "DexFan Water Sensor";

/// Stable identifier of the exposed temperature sensor
pub const WATER_SENSOR_ID: &str = "DexControllerWaterTempCS";

/// Display name of the exposed temperature sensor
pub const WATER_SENSOR_NAME: &str = "Water Temperature (C)";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_probe_endpoint() {
        assert_eq!(DexWaterProbe::DEVICE_PATH, "COM14");
        assert_eq!(DexWaterProbe::BAUD_RATE, 9600);
    }

    #[test]
    fn test_probe_query_protocol() {
        assert_eq!(DexWaterProbe::QUERY_TOKEN, "t");
        assert_eq!(DexWaterProbe::LINE_TERMINATOR, "\n");
    }

    #[test]
    fn test_default_device_is_water_probe() {
        assert_eq!(DefaultDevice::NAME, DexWaterProbe::NAME);
        assert_eq!(DefaultDevice::DEFAULT_TIMEOUT_MS, 1000);
    }
}
