//! Sensor link - serial acquisition, polling, and recovery
//!
//! Owns at most one open transport to the probe and refreshes the shared
//! [`WaterSensor`] reading on each poll. Every failure is written to the host
//! log sink and swallowed; nothing here returns an error to the caller.

use crate::water_sensor::WaterSensor;
use dexfan_core::{DefaultDevice, Degrees, DeviceConfig, PluginLogger};
use dexfan_hardware::{is_disconnect_error, Connector, SerialTransport};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Link state machine states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkState {
    /// No transport held
    Closed,
    /// A transport is open and presumed usable
    Open,
}

impl LinkState {
    /// Get a string representation for log messages
    pub fn as_str(&self) -> &'static str {
        match self {
            LinkState::Closed => "closed",
            LinkState::Open => "open",
        }
    }
}

/// Result of a single poll
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    /// Link closed, no I/O performed
    Skipped,
    /// Reading refreshed
    Updated(Degrees),
    /// Reply was not an integer; reading unchanged
    Malformed,
    /// Write or read failed; `disconnected` means the link was dropped
    Fault { disconnected: bool },
}

/// Serial link to the water temperature probe
pub struct SensorLink {
    connector: Box<dyn Connector>,
    device_path: String,
    query: String,
    timeout: Duration,
    link: Option<Box<dyn SerialTransport>>,
    sensor: Arc<WaterSensor>,
    logger: Arc<dyn PluginLogger>,
}

impl SensorLink {
    /// Create a closed link to the default probe
    pub fn new(
        connector: Box<dyn Connector>,
        sensor: Arc<WaterSensor>,
        logger: Arc<dyn PluginLogger>,
        timeout: Duration,
    ) -> Self {
        Self::for_device::<DefaultDevice>(connector, sensor, logger, timeout)
    }

    /// Create a closed link to device `D`
    pub fn for_device<D: DeviceConfig>(
        connector: Box<dyn Connector>,
        sensor: Arc<WaterSensor>,
        logger: Arc<dyn PluginLogger>,
        timeout: Duration,
    ) -> Self {
        Self {
            connector,
            device_path: D::DEVICE_PATH.to_string(),
            query: D::QUERY_TOKEN.to_string(),
            timeout,
            link: None,
            sensor,
            logger,
        }
    }

    /// Current state
    pub fn state(&self) -> LinkState {
        if self.link.is_some() {
            LinkState::Open
        } else {
            LinkState::Closed
        }
    }

    /// Fixed endpoint this link opens
    pub fn device_path(&self) -> &str {
        &self.device_path
    }

    /// Open the serial connection
    ///
    /// Any link already held is released first. Returns `true` if the link
    /// is open afterwards; a failure is logged and leaves the link closed.
    pub fn open(&mut self) -> bool {
        self.close();

        debug!("Opening sensor link at {}", self.device_path);
        match self.connector.connect(&self.device_path, self.timeout) {
            Ok(transport) => {
                info!("Sensor link open on {}", transport.port_path());
                self.link = Some(transport);
                true
            }
            Err(e) => {
                self.logger.log(&format!(
                    "Failed to open serial port {}: {}",
                    self.device_path, e
                ));
                false
            }
        }
    }

    /// Query the probe once and refresh the reading
    pub async fn poll(&mut self) -> PollOutcome {
        let Some(link) = self.link.as_mut() else {
            debug!("Poll skipped: link {}", LinkState::Closed.as_str());
            return PollOutcome::Skipped;
        };

        let line = match link.transaction(&self.query).await {
            Ok(line) => line,
            Err(e) => {
                self.logger
                    .log(&format!("Exception while reading serial port: {}", e));

                let disconnected = is_disconnect_error(&e);
                if disconnected {
                    warn!("Sensor link lost, closing until reopened");
                    self.link = None;
                }
                return PollOutcome::Fault { disconnected };
            }
        };

        debug!("Probe replied: {:?}", line);

        match line.parse::<Degrees>() {
            Ok(value) => {
                self.sensor.set_reading(value);
                PollOutcome::Updated(value)
            }
            Err(e) => {
                self.logger.log(&e.to_string());
                PollOutcome::Malformed
            }
        }
    }

    /// Release the connection. Returns `false` if it was already closed.
    pub fn close(&mut self) -> bool {
        match self.link.take() {
            Some(transport) => {
                info!("Closing sensor link on {}", transport.port_path());
                true
            }
            None => false,
        }
    }
}
