//! Temperature sensor capability registered with the host

use dexfan_core::{Degrees, PluginSensor, WATER_SENSOR_ID, WATER_SENSOR_NAME};
use std::sync::RwLock;

/// Holder for the latest water temperature reading
///
/// The sensor link is the only writer; the host reads through
/// [`PluginSensor::value`] from whichever thread it likes.
#[derive(Debug, Default)]
pub struct WaterSensor {
    reading: RwLock<Option<Degrees>>,
}

impl WaterSensor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last successfully parsed reading
    pub fn reading(&self) -> Option<Degrees> {
        *self.reading.read().unwrap_or_else(|e| e.into_inner())
    }

    pub(crate) fn set_reading(&self, value: Degrees) {
        *self.reading.write().unwrap_or_else(|e| e.into_inner()) = Some(value);
    }
}

impl PluginSensor for WaterSensor {
    fn id(&self) -> &str {
        WATER_SENSOR_ID
    }

    fn name(&self) -> &str {
        WATER_SENSOR_NAME
    }

    fn value(&self) -> Option<f32> {
        self.reading().map(Degrees::as_f32)
    }
}
