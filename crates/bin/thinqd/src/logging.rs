//! Tracing subscriber setup with a reloadable filter behind `/log/{level}`.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Registry, reload};

use thinq_bridge_app::ports::LogControl;
use thinq_bridge_domain::error::BridgeError;
use thinq_bridge_domain::log_level::LogLevel;

/// [`LogControl`] swapping the global filter of the fmt subscriber.
pub struct ReloadLogControl {
    handle: reload::Handle<EnvFilter, Registry>,
}

impl LogControl for ReloadLogControl {
    fn set_level(&self, level: LogLevel) -> Result<(), BridgeError> {
        self.handle
            .reload(EnvFilter::new(level.as_str()))
            .map_err(|err| BridgeError::Storage(Box::new(err)))
    }
}

/// Install the global subscriber with `filter` (`RUST_LOG` syntax).
///
/// # Errors
///
/// Returns an error when the filter does not parse or a global subscriber
/// is already installed.
pub fn init(filter: &str) -> anyhow::Result<ReloadLogControl> {
    let filter = EnvFilter::try_new(filter)?;
    let (layer, handle) = reload::Layer::new(filter);
    tracing_subscriber::registry()
        .with(layer)
        .with(tracing_subscriber::fmt::layer())
        .try_init()?;
    Ok(ReloadLogControl { handle })
}
