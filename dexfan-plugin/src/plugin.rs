//! Host lifecycle glue
//!
//! [`DexPlugin`] wires the sensor link, the water sensor capability, and the
//! reconnect policy to the host's `Plugin` hooks.

use crate::reconnect::ReconnectPolicy;
use crate::sensor_link::{LinkState, PollOutcome, SensorLink};
use crate::water_sensor::WaterSensor;
use async_trait::async_trait;
use dexfan_core::{
    default_config_path, DefaultDevice, Plugin, PluginConfig, PluginLogger, SensorContainer,
    PLUGIN_NAME, WATER_SENSOR_ID,
};
use dexfan_hardware::{Connector, SerialConnector};
use std::path::Path;
use std::sync::Arc;
use tokio::time::Instant;
use tracing::{debug, info};

/// DexFan water sensor plugin
pub struct DexPlugin {
    link: SensorLink,
    sensor: Arc<WaterSensor>,
    reconnect: ReconnectPolicy,
}

impl DexPlugin {
    /// Create the plugin with configuration from the default path
    pub fn new(logger: Arc<dyn PluginLogger>) -> Self {
        Self::from_config_path(logger, &default_config_path())
    }

    /// Create the plugin with configuration read from `path`
    ///
    /// A missing file means defaults. A malformed file is reported to
    /// `logger` and defaults are used.
    pub fn from_config_path(logger: Arc<dyn PluginLogger>, path: &Path) -> Self {
        let config = match PluginConfig::load(path) {
            Ok(config) => config,
            Err(e) => {
                logger.log(&format!(
                    "Failed to load configuration from {}: {}; using defaults",
                    path.display(),
                    e
                ));
                PluginConfig::default()
            }
        };

        let connector = SerialConnector::<DefaultDevice>::new();
        Self::with_config(logger, config, Box::new(connector))
    }

    /// Create the plugin with explicit configuration and connector
    pub fn with_config(
        logger: Arc<dyn PluginLogger>,
        config: PluginConfig,
        connector: Box<dyn Connector>,
    ) -> Self {
        let sensor = Arc::new(WaterSensor::new());
        let link = SensorLink::new(connector, sensor.clone(), logger, config.link.timeout());

        Self {
            link,
            sensor,
            reconnect: ReconnectPolicy::new(config.reconnect),
        }
    }

    /// The sensor capability registered with the host
    pub fn sensor(&self) -> Arc<WaterSensor> {
        self.sensor.clone()
    }

    /// Current link state
    pub fn link_state(&self) -> LinkState {
        self.link.state()
    }

    /// Reconnect bookkeeping
    pub fn reconnect(&self) -> &ReconnectPolicy {
        &self.reconnect
    }

    fn try_reopen(&mut self) {
        info!(
            "Attempting to reopen sensor link at {}",
            self.link.device_path()
        );
        if self.link.open() {
            self.reconnect.record_success();
        } else {
            self.reconnect.record_failure(Instant::now());
        }
    }
}

#[async_trait]
impl Plugin for DexPlugin {
    fn name(&self) -> &str {
        PLUGIN_NAME
    }

    fn load(&mut self, container: &mut SensorContainer) {
        if container.temp_sensor(WATER_SENSOR_ID).is_some() {
            debug!("Water sensor already registered");
            return;
        }
        container.add_temp_sensor(self.sensor.clone());
    }

    async fn initialize(&mut self) {
        self.reconnect.reset();
        if !self.link.open() {
            self.reconnect.arm(Instant::now());
        }
    }

    async fn update(&mut self) {
        if self.link.state() == LinkState::Closed && self.reconnect.should_attempt(Instant::now())
        {
            self.try_reopen();
        }

        if let PollOutcome::Fault { disconnected: true } = self.link.poll().await {
            if !self.reconnect.enabled() {
                debug!("Reconnect disabled, link stays closed until reinitialized");
            }
            self.reconnect.arm(Instant::now());
        }
    }

    async fn close(&mut self) {
        self.link.close();
        self.reconnect.reset();
    }
}
