//! Session store port: persistence of [`SessionState`] between restarts.

use std::future::Future;

use thinq_bridge_domain::error::BridgeError;
use thinq_bridge_domain::session::SessionState;

pub trait SessionStore: Send + Sync {
    /// Load the state saved under `name`, `None` when nothing was saved yet.
    fn load(
        &self,
        name: &str,
    ) -> impl Future<Output = Result<Option<SessionState>, BridgeError>> + Send;

    /// Save the state under `name` and return where it was written.
    fn save(
        &self,
        name: &str,
        state: &SessionState,
    ) -> impl Future<Output = Result<String, BridgeError>> + Send;
}
