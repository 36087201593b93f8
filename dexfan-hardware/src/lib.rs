//! dexfan-hardware
//!
//! Hardware abstraction crate that contains the serial transport used to talk
//! to the water temperature probe. The plugin crate drives it through the
//! [`SerialTransport`] and [`Connector`] traits so the link logic can be
//! exercised without a device attached.
//!
//! Public API:
//! - `serial_driver::SerialDriver`: tokio-serial backed line transport
//! - `serial_driver::SerialConnector`: opens `SerialDriver`s on demand
//! - `serial_driver::is_disconnect_error`: disconnect vs. transient fault split

pub mod serial_driver;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use serial_driver::{
    is_disconnect_error, Connector, SerialConnector, SerialDriver, SerialTransport,
};
