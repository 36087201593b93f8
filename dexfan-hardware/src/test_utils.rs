//! Test utilities for exercising the sensor link without hardware
//!
//! [`MockTransport`] replays queued replies and records every command sent.
//! [`MockConnector`] hands out clones of one shared transport and can be
//! toggled between "device present" and "device absent". Clones share state,
//! so a test can keep a handle after boxing one into the link.

use crate::serial_driver::{Connector, SerialTransport};
use async_trait::async_trait;
use dexfan_core::{DexFanError, Result};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Default)]
struct MockState {
    /// Queued replies, popped one per transaction
    replies: VecDeque<Result<String>>,
    /// Record of commands sent
    sent_commands: Vec<String>,
}

/// In-memory transport with scripted replies
#[derive(Clone)]
pub struct MockTransport {
    state: Arc<Mutex<MockState>>,
    port_path: String,
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl MockTransport {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(MockState::default())),
            port_path: "MOCK".to_string(),
        }
    }

    fn state(&self) -> std::sync::MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Queue a response line
    pub fn queue_line(&self, line: &str) {
        self.state().replies.push_back(Ok(line.to_string()));
    }

    /// Queue a transport fault
    pub fn queue_fault(&self, err: DexFanError) {
        self.state().replies.push_back(Err(err));
    }

    /// Queue a fault that means the device went away
    pub fn queue_disconnect(&self) {
        self.queue_fault(DexFanError::DeviceDisconnected(
            "Serial port returned EOF - device may have been unplugged".to_string(),
        ));
    }

    /// Commands sent so far, without line terminators
    pub fn sent_commands(&self) -> Vec<String> {
        self.state().sent_commands.clone()
    }

    /// Number of transactions attempted
    pub fn transaction_count(&self) -> usize {
        self.state().sent_commands.len()
    }

    /// Number of replies not yet consumed
    pub fn pending_replies(&self) -> usize {
        self.state().replies.len()
    }
}

#[async_trait]
impl SerialTransport for MockTransport {
    async fn transaction(&mut self, command: &str) -> Result<String> {
        let mut state = self.state();
        state.sent_commands.push(command.to_string());

        // A silent device looks like a read timeout
        state
            .replies
            .pop_front()
            .unwrap_or_else(|| Err(DexFanError::Timeout("No response queued".to_string())))
    }

    fn port_path(&self) -> &str {
        &self.port_path
    }
}

/// Connector handing out a shared [`MockTransport`]
#[derive(Clone)]
pub struct MockConnector {
    transport: MockTransport,
    available: Arc<AtomicBool>,
    attempts: Arc<AtomicU32>,
    opened_paths: Arc<Mutex<Vec<String>>>,
}

impl MockConnector {
    /// Connector whose device is present
    pub fn new(transport: MockTransport) -> Self {
        Self {
            transport,
            available: Arc::new(AtomicBool::new(true)),
            attempts: Arc::new(AtomicU32::new(0)),
            opened_paths: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Connector whose device is absent until `set_available(true)`
    pub fn unavailable(transport: MockTransport) -> Self {
        let connector = Self::new(transport);
        connector.set_available(false);
        connector
    }

    /// Make subsequent `connect` calls succeed or fail
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// Number of `connect` calls, successful or not
    pub fn attempts(&self) -> u32 {
        self.attempts.load(Ordering::SeqCst)
    }

    /// Paths successfully opened, in order
    pub fn opened_paths(&self) -> Vec<String> {
        self.opened_paths
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

impl Connector for MockConnector {
    fn connect(&self, port_path: &str, _timeout: Duration) -> Result<Box<dyn SerialTransport>> {
        self.attempts.fetch_add(1, Ordering::SeqCst);

        if !self.available.load(Ordering::SeqCst) {
            return Err(DexFanError::Serial(format!(
                "Failed to open serial port {}: No such file or directory",
                port_path
            )));
        }

        self.opened_paths
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(port_path.to_string());

        let mut transport = self.transport.clone();
        transport.port_path = port_path.to_string();
        Ok(Box::new(transport))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_replays_in_order() {
        let mut mock = MockTransport::new();
        mock.queue_line("21");
        mock.queue_disconnect();

        assert_eq!(mock.transaction("t").await.unwrap(), "21");
        assert!(matches!(
            mock.transaction("t").await,
            Err(DexFanError::DeviceDisconnected(_))
        ));
        assert!(matches!(
            mock.transaction("t").await,
            Err(DexFanError::Timeout(_))
        ));
        assert_eq!(mock.sent_commands(), vec!["t", "t", "t"]);
    }

    #[test]
    fn test_connector_availability() {
        let connector = MockConnector::unavailable(MockTransport::new());
        assert!(connector.connect("COM14", Duration::from_millis(10)).is_err());

        connector.set_available(true);
        let transport = connector.connect("COM14", Duration::from_millis(10)).unwrap();
        assert_eq!(transport.port_path(), "COM14");
        assert_eq!(connector.attempts(), 2);
        assert_eq!(connector.opened_paths(), vec!["COM14"]);
    }
}
