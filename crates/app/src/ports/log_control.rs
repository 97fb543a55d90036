//! Log control port: runtime log level changes.

use thinq_bridge_domain::error::BridgeError;
use thinq_bridge_domain::log_level::LogLevel;

pub trait LogControl: Send + Sync {
    /// Replace the active log level.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::Storage`] when the logging backend refuses the
    /// change.
    fn set_level(&self, level: LogLevel) -> Result<(), BridgeError>;
}
