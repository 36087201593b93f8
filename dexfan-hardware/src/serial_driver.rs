//! Serial driver for low-level hardware communication
//!
//! Provides async line-oriented serial I/O with the water temperature probe.

use async_trait::async_trait;
use dexfan_core::{DefaultDevice, DeviceConfig, DexFanError, Result};
use std::io;
use std::marker::PhantomData;
use std::time::Duration;
use tokio::time::timeout;
use tokio_serial::{SerialPort, SerialPortBuilderExt, SerialStream};
use tracing::{debug, error, warn};

/// Trait for serial transport abstraction
///
/// This trait enables testing of the sensor link without real hardware
/// by allowing mock implementations.
#[async_trait]
pub trait SerialTransport: Send {
    /// Send a command line and wait for one response line
    ///
    /// The returned line has its terminator stripped.
    async fn transaction(&mut self, command: &str) -> Result<String>;

    /// Get the port path this transport was opened on
    fn port_path(&self) -> &str;
}

/// Opens transports on demand
///
/// The sensor link holds a connector rather than a transport so it can open,
/// drop and reopen the link over its lifetime.
pub trait Connector: Send + Sync {
    /// Open a transport at `port_path`, bounding each exchange by `timeout`
    fn connect(&self, port_path: &str, timeout: Duration) -> Result<Box<dyn SerialTransport>>;
}

/// Serial driver for hardware communication
pub struct SerialDriver<D: DeviceConfig = DefaultDevice> {
    port: SerialStream,
    port_path: String,
    timeout_duration: Duration,
    _device: PhantomData<D>,
}

impl<D: DeviceConfig> SerialDriver<D> {
    /// Create a new serial driver
    ///
    /// # Arguments
    /// * `port_path` - Path to the serial device (e.g., "COM14", "/dev/ttyACM0")
    /// * `timeout_duration` - Bound on each write and read
    pub fn new(port_path: &str, timeout_duration: Duration) -> Result<Self> {
        debug!("Opening serial port: {}", port_path);

        let port = tokio_serial::new(port_path, D::BAUD_RATE)
            .timeout(timeout_duration)
            .data_bits(tokio_serial::DataBits::Eight)
            .parity(tokio_serial::Parity::None)
            .stop_bits(tokio_serial::StopBits::One)
            .flow_control(tokio_serial::FlowControl::None)
            .open_native_async()
            .map_err(|e| {
                error!("Failed to open serial port {}: {}", port_path, e);
                DexFanError::Serial(format!("Failed to open serial port {}: {}", port_path, e))
            })?;

        debug!("Serial port opened successfully");

        Ok(Self {
            port,
            port_path: port_path.to_string(),
            timeout_duration,
            _device: PhantomData,
        })
    }

    /// Send a command to the serial port
    async fn send(&mut self, command: &str) -> Result<()> {
        let full_command = format!("{}{}", command, D::LINE_TERMINATOR);

        debug!("TX: {:?}", full_command);

        use tokio::io::AsyncWriteExt;

        timeout(
            self.timeout_duration,
            self.port.write_all(full_command.as_bytes()),
        )
        .await
        .map_err(|_| {
            error!("Write timeout");
            DexFanError::Timeout("Write operation timed out".to_string())
        })?
        .map_err(|e| {
            error!("Write failed: {}", e);
            classify_io_error("Write failed", e)
        })?;

        // Flush to ensure data is sent
        timeout(self.timeout_duration, self.port.flush())
            .await
            .map_err(|_| DexFanError::Timeout("Flush operation timed out".to_string()))?
            .map_err(|e| classify_io_error("Flush failed", e))?;

        Ok(())
    }

    /// Read one non-empty line
    async fn read_response(&mut self) -> Result<String> {
        use tokio::io::AsyncBufReadExt;
        use tokio::io::BufReader;

        let mut reader = BufReader::new(&mut self.port);

        let result = timeout(self.timeout_duration, async {
            loop {
                let mut line = String::new();
                match reader.read_line(&mut line).await {
                    Ok(0) => {
                        // EOF indicates device disconnection (USB unplugged, power loss, etc.)
                        warn!("Serial port returned EOF - device may have been disconnected");
                        return Err(DexFanError::DeviceDisconnected(
                            "Serial port returned EOF - device may have been unplugged".to_string(),
                        ));
                    }
                    Ok(_) => {
                        let line = line.trim();
                        if !line.is_empty() {
                            debug!("RX: {:?}", line);
                            return Ok(line.to_string());
                        }
                    }
                    Err(e) => {
                        error!("Read error: {}", e);
                        return Err(classify_io_error("Read error", e));
                    }
                }
            }
        })
        .await;

        match result {
            Ok(line) => line,
            Err(_) => {
                error!("Read timeout");
                Err(DexFanError::Timeout("Read operation timed out".to_string()))
            }
        }
    }

    /// Drop anything the probe sent unprompted
    ///
    /// Best effort: serialport reports a hung-up port here without its OS
    /// error code, so the write that follows decides whether the link is gone.
    fn discard_pending_input(&mut self) {
        if let Err(e) = self.port.clear(tokio_serial::ClearBuffer::Input) {
            warn!("Failed to clear input buffer: {}", e);
        }
    }
}

#[async_trait]
impl<D: DeviceConfig> SerialTransport for SerialDriver<D> {
    async fn transaction(&mut self, command: &str) -> Result<String> {
        self.discard_pending_input();

        self.send(command).await?;

        self.read_response().await
    }

    fn port_path(&self) -> &str {
        &self.port_path
    }
}

/// Connector producing real `SerialDriver`s
pub struct SerialConnector<D: DeviceConfig = DefaultDevice> {
    _device: PhantomData<D>,
}

impl<D: DeviceConfig> SerialConnector<D> {
    /// Create a connector for device `D`
    pub fn new() -> Self {
        Self {
            _device: PhantomData,
        }
    }
}

impl<D: DeviceConfig> Default for SerialConnector<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: DeviceConfig> Connector for SerialConnector<D> {
    fn connect(&self, port_path: &str, timeout: Duration) -> Result<Box<dyn SerialTransport>> {
        let driver = SerialDriver::<D>::new(port_path, timeout)?;
        Ok(Box::new(driver))
    }
}

/// OS error codes that mean the device behind the port is gone
#[cfg(unix)]
const DISCONNECT_OS_ERRORS: &[i32] = &[
    5,  // EIO
    6,  // ENXIO
    19, // ENODEV
];

#[cfg(windows)]
const DISCONNECT_OS_ERRORS: &[i32] = &[
    22,   // ERROR_BAD_COMMAND
    995,  // ERROR_OPERATION_ABORTED
    1167, // ERROR_DEVICE_NOT_CONNECTED
];

#[cfg(not(any(unix, windows)))]
const DISCONNECT_OS_ERRORS: &[i32] = &[];

/// Map an I/O error onto the typed error taxonomy
///
/// Errors that mean the connection itself is unusable become
/// `DeviceDisconnected`; everything else is a transient `Serial` error.
pub fn classify_io_error(context: &str, err: io::Error) -> DexFanError {
    let disconnected = matches!(
        err.kind(),
        io::ErrorKind::BrokenPipe
            | io::ErrorKind::NotConnected
            | io::ErrorKind::ConnectionReset
            | io::ErrorKind::ConnectionAborted
            | io::ErrorKind::UnexpectedEof
    ) || err
        .raw_os_error()
        .is_some_and(|code| DISCONNECT_OS_ERRORS.contains(&code));

    if disconnected {
        DexFanError::DeviceDisconnected(format!("{}: {}", context, err))
    } else {
        DexFanError::Serial(format!("{}: {}", context, err))
    }
}

/// Determine if an error indicates device disconnection
///
/// Returns `true` if the link must be dropped and reopened before it can be
/// used again, `false` for transient errors such as timeouts.
pub fn is_disconnect_error(err: &DexFanError) -> bool {
    matches!(err, DexFanError::DeviceDisconnected(_))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_missing_device_fails() {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let result = rt.block_on(async {
            SerialDriver::<DefaultDevice>::new(
                "/nonexistent/dexfan-probe",
                Duration::from_millis(100),
            )
        });

        assert!(matches!(result, Err(DexFanError::Serial(_))));
    }

    #[test]
    fn test_connector_missing_device_fails() {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let connector = SerialConnector::<DefaultDevice>::new();
        let result = rt.block_on(async {
            connector.connect("/nonexistent/dexfan-probe", Duration::from_millis(100))
        });

        assert!(result.is_err());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_transaction_after_hangup_is_disconnect() {
        let (master, slave) = SerialStream::pair().unwrap();
        let path = slave.name().unwrap();
        let mut driver =
            SerialDriver::<DefaultDevice>::new(&path, Duration::from_millis(200)).unwrap();

        // Closing the master side hangs up the tty, as an unplugged probe does
        drop(master);

        let err = driver.transaction("t").await.unwrap_err();
        assert!(is_disconnect_error(&err), "expected disconnect, got {:?}", err);

        let err = driver.transaction("t").await.unwrap_err();
        assert!(is_disconnect_error(&err), "expected disconnect, got {:?}", err);

        drop(slave);
    }

    #[test]
    fn test_classify_broken_pipe_as_disconnect() {
        let err = classify_io_error("Write failed", io::Error::from(io::ErrorKind::BrokenPipe));
        assert!(is_disconnect_error(&err));
        assert!(err.to_string().contains("Write failed"));
    }

    #[test]
    fn test_classify_eof_and_reset_as_disconnect() {
        for kind in [
            io::ErrorKind::UnexpectedEof,
            io::ErrorKind::NotConnected,
            io::ErrorKind::ConnectionReset,
            io::ErrorKind::ConnectionAborted,
        ] {
            let err = classify_io_error("Read error", io::Error::from(kind));
            assert!(is_disconnect_error(&err), "{:?} should disconnect", kind);
        }
    }

    #[test]
    fn test_classify_os_disconnect_codes() {
        for &code in DISCONNECT_OS_ERRORS {
            let err = classify_io_error("Read error", io::Error::from_raw_os_error(code));
            assert!(is_disconnect_error(&err), "os error {} should disconnect", code);
        }
    }

    #[test]
    fn test_classify_other_io_as_transient() {
        let err = classify_io_error(
            "Read error",
            io::Error::new(io::ErrorKind::InvalidData, "stream did not contain valid UTF-8"),
        );
        assert!(matches!(err, DexFanError::Serial(_)));
        assert!(!is_disconnect_error(&err));
    }

    #[test]
    fn test_is_disconnect_error_device_disconnected() {
        let err = DexFanError::DeviceDisconnected("port closed".to_string());
        assert!(is_disconnect_error(&err));
    }

    #[test]
    fn test_is_disconnect_error_timeout_not_disconnect() {
        let err = DexFanError::Timeout("Read timeout".to_string());
        assert!(!is_disconnect_error(&err));
    }

    #[test]
    fn test_is_disconnect_error_does_not_inspect_message() {
        let err = DexFanError::Serial("The port is closed.".to_string());
        assert!(!is_disconnect_error(&err));
    }

    #[test]
    fn test_is_disconnect_error_other_not_disconnect() {
        assert!(!is_disconnect_error(&DexFanError::Parse("abc".to_string())));
        assert!(!is_disconnect_error(&DexFanError::Config("bad".to_string())));
    }
}
