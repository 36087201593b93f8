//! Host plugin interfaces
//!
//! The fan-control host owns the plugin lifecycle, the sensor collection and
//! the log sink. These traits describe what the host provides and what it
//! expects from a plugin; the plugin consumes them and never reimplements the
//! host side.

use async_trait::async_trait;
use std::sync::Arc;

/// A sensor capability the host can query at its own cadence
pub trait PluginSensor: Send + Sync {
    /// Stable identifier, unique within the host
    fn id(&self) -> &str;

    /// Human-readable name shown by the host
    fn name(&self) -> &str;

    /// Latest value, or `None` when nothing has been read yet
    fn value(&self) -> Option<f32>;

    /// Called by the host before reading `value()`
    fn update(&self) {}
}

/// Write-only log sink provided by the host
pub trait PluginLogger: Send + Sync {
    /// Record one log entry
    fn log(&self, message: &str);
}

/// Host-provided collection that plugins register their sensors into
#[derive(Default)]
pub struct SensorContainer {
    /// Registered temperature sensors
    pub temp_sensors: Vec<Arc<dyn PluginSensor>>,
}

impl SensorContainer {
    /// Create an empty container
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a temperature sensor
    pub fn add_temp_sensor(&mut self, sensor: Arc<dyn PluginSensor>) {
        self.temp_sensors.push(sensor);
    }

    /// Look up a temperature sensor by identifier
    pub fn temp_sensor(&self, id: &str) -> Option<&Arc<dyn PluginSensor>> {
        self.temp_sensors.iter().find(|s| s.id() == id)
    }
}

/// Lifecycle the host drives on every loaded plugin
///
/// The host calls `load` and `initialize` once, then `update` repeatedly on
/// its own timer, then `close` once. Calls are never overlapped. None of the
/// hooks report errors; failures are written to the plugin's log sink.
#[async_trait]
pub trait Plugin: Send {
    /// Plugin display name
    fn name(&self) -> &str;

    /// Register sensor capabilities into the host's collection
    fn load(&mut self, container: &mut SensorContainer);

    /// Acquire resources
    async fn initialize(&mut self);

    /// Refresh sensor values
    async fn update(&mut self);

    /// Release resources
    async fn close(&mut self);
}
