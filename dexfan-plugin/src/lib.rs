//! DexFan water sensor plugin
//!
//! Polls the DexFan water temperature probe over a serial link and exposes the
//! latest reading to a fan-control host as a temperature sensor.
//!
//! The host drives [`DexPlugin`] through the [`dexfan_core::Plugin`] hooks:
//!
//! ```no_run
//! use dexfan_core::{Plugin, SensorContainer};
//! use dexfan_plugin::{DexPlugin, TracingLogger};
//! use std::sync::Arc;
//!
//! # async fn example() {
//! let mut container = SensorContainer::new();
//! let mut plugin = DexPlugin::new(Arc::new(TracingLogger));
//!
//! plugin.load(&mut container);
//! plugin.initialize().await;
//! plugin.update().await;
//!
//! let celsius = container.temp_sensors[0].value();
//! plugin.close().await;
//! # let _ = celsius;
//! # }
//! ```

pub mod logger;
pub mod plugin;
pub mod reconnect;
pub mod sensor_link;
pub mod water_sensor;

pub use logger::TracingLogger;
pub use plugin::DexPlugin;
pub use reconnect::ReconnectPolicy;
pub use sensor_link::{LinkState, PollOutcome, SensorLink};
pub use water_sensor::WaterSensor;
