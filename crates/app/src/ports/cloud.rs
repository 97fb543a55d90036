//! Cloud port: the LG `SmartThinQ` API as seen by the application.
//!
//! The OAuth flow and the wire protocol live behind this trait. Every call
//! that needs a session takes a [`CloudSession`]; an expired session is
//! reported as [`CloudError::NotLoggedIn`](thinq_bridge_domain::error::CloudError::NotLoggedIn)
//! so the caller can refresh and retry.

use std::future::Future;

use thinq_bridge_domain::command::DeviceCommand;
use thinq_bridge_domain::device::DeviceInfo;
use thinq_bridge_domain::error::BridgeError;
use thinq_bridge_domain::locale::Locale;
use thinq_bridge_domain::model::ModelInfo;
use thinq_bridge_domain::session::Credentials;

/// An open session against the regional gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloudSession {
    pub locale: Locale,
    pub credentials: Credentials,
    pub session_id: String,
}

/// Driven port for the LG cloud.
pub trait ThinqCloud: Send + Sync {
    /// Login page URL of the regional gateway.
    fn oauth_url(&self, locale: &Locale)
    -> impl Future<Output = Result<String, BridgeError>> + Send;

    /// Exchange the URL the login page redirected to for credentials.
    fn login(
        &self,
        locale: &Locale,
        callback_url: &str,
    ) -> impl Future<Output = Result<Credentials, BridgeError>> + Send;

    /// Refresh the access token and open a new session.
    fn refresh(
        &self,
        locale: &Locale,
        credentials: &Credentials,
    ) -> impl Future<Output = Result<CloudSession, BridgeError>> + Send;

    /// Devices registered on the account.
    fn devices(
        &self,
        session: &CloudSession,
    ) -> impl Future<Output = Result<Vec<DeviceInfo>, BridgeError>> + Send;

    /// Value descriptors of the device model.
    fn model_info(
        &self,
        session: &CloudSession,
        device: &DeviceInfo,
    ) -> impl Future<Output = Result<ModelInfo, BridgeError>> + Send;

    /// Start monitoring a device, returning the work id to poll with.
    fn monitor_start(
        &self,
        session: &CloudSession,
        device_id: &str,
    ) -> impl Future<Output = Result<String, BridgeError>> + Send;

    /// Poll a running monitor. `None` means no data yet.
    fn monitor_poll(
        &self,
        session: &CloudSession,
        device_id: &str,
        work_id: &str,
    ) -> impl Future<Output = Result<Option<Vec<u8>>, BridgeError>> + Send;

    /// Stop a running monitor.
    fn monitor_stop(
        &self,
        session: &CloudSession,
        device_id: &str,
        work_id: &str,
    ) -> impl Future<Output = Result<(), BridgeError>> + Send;

    /// Send a control command to a device.
    fn send_command(
        &self,
        session: &CloudSession,
        device_id: &str,
        command: DeviceCommand,
    ) -> impl Future<Output = Result<(), BridgeError>> + Send;

    /// Read the configuration of an AC device (filters, energy, power, …).
    fn ac_config(
        &self,
        session: &CloudSession,
        device_id: &str,
    ) -> impl Future<Output = Result<serde_json::Value, BridgeError>> + Send;
}
