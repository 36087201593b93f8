//! Log sink for hosts that do not supply their own

use dexfan_core::PluginLogger;
use tracing::warn;

/// Forwards plugin log entries to `tracing`
///
/// Every entry the plugin sends to its host sink reports a failure, so they
/// are emitted at `warn` level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl PluginLogger for TracingLogger {
    fn log(&self, message: &str) {
        warn!(target: "dexfan::host", "{}", message);
    }
}
