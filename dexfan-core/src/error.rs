//! Error types for the DexFan plugin

use thiserror::Error;

/// Core error type for DexFan operations
#[derive(Error, Debug)]
pub enum DexFanError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serial port errors that leave the connection usable
    #[error("Serial port error: {0}")]
    Serial(String),

    /// Timeout errors
    #[error("Operation timed out: {0}")]
    Timeout(String),

    /// Device disconnected (USB unplugged, port closed, power cycle)
    #[error("Device disconnected: {0}")]
    DeviceDisconnected(String),

    /// Parsing errors
    #[error("Parse error: {0}")]
    Parse(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for DexFan operations
pub type Result<T> = std::result::Result<T, DexFanError>;

impl From<toml::de::Error> for DexFanError {
    fn from(err: toml::de::Error) -> Self {
        DexFanError::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toml_error_conversion() {
        let toml_err = toml::from_str::<toml::Value>("not = [valid").unwrap_err();
        let err: DexFanError = toml_err.into();

        match err {
            DexFanError::Config(msg) => assert!(!msg.is_empty()),
            _ => panic!("Expected Config error"),
        }
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let err: DexFanError = io_err.into();

        match err {
            DexFanError::Io(e) => assert_eq!(e.kind(), std::io::ErrorKind::NotFound),
            _ => panic!("Expected Io error"),
        }
    }

    #[test]
    fn test_error_display() {
        let err = DexFanError::Serial("framing error".to_string());
        assert_eq!(format!("{}", err), "Serial port error: framing error");

        let err = DexFanError::DeviceDisconnected("port closed".to_string());
        assert_eq!(format!("{}", err), "Device disconnected: port closed");

        let err = DexFanError::Parse("abc".to_string());
        assert_eq!(format!("{}", err), "Parse error: abc");

        let err = DexFanError::Timeout("Read operation timed out".to_string());
        assert_eq!(
            format!("{}", err),
            "Operation timed out: Read operation timed out"
        );
    }
}
