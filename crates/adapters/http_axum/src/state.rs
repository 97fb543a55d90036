//! Shared application state for axum handlers.

use std::sync::Arc;

use axum::http::HeaderMap;

use thinq_bridge_app::ports::{JeedomApi, LogControl, SessionStore, ThinqCloud};
use thinq_bridge_app::services::command_service::CommandService;
use thinq_bridge_app::services::device_service::DeviceService;
use thinq_bridge_app::services::jeedom_sync::JeedomSync;
use thinq_bridge_app::services::monitor_service::{MonitorService, PollSettings};
use thinq_bridge_app::services::session_service::SessionService;
use thinq_bridge_domain::error::BridgeError;
use thinq_bridge_domain::session::TOKEN_KEY;

/// Application state shared across all axum handlers.
///
/// Generic over the cloud client, the session store, the Jeedom client and
/// the log control to avoid dynamic dispatch. `Clone` is implemented
/// manually so the underlying types themselves do not need to be `Clone`.
pub struct AppState<C, S, J, L> {
    /// Session, login and persistence.
    pub session: Arc<SessionService<C, S>>,
    /// Device listing.
    pub devices: Arc<DeviceService<C, S>>,
    /// Device monitoring.
    pub monitor: Arc<MonitorService<C, S>>,
    /// AC commands.
    pub commands: Arc<CommandService<C, S>>,
    /// Jeedom synchronisation, when Jeedom is configured.
    pub jeedom: Option<Arc<JeedomSync<C, S, J>>>,
    /// Runtime log level.
    pub log: Arc<L>,
    /// Poll bounds of `/mon/{id}`.
    pub poll: PollSettings,
    /// Reported by the `/` banner.
    pub debug: bool,
}

impl<C, S, J, L> Clone for AppState<C, S, J, L> {
    fn clone(&self) -> Self {
        Self {
            session: Arc::clone(&self.session),
            devices: Arc::clone(&self.devices),
            monitor: Arc::clone(&self.monitor),
            commands: Arc::clone(&self.commands),
            jeedom: self.jeedom.clone(),
            log: Arc::clone(&self.log),
            poll: self.poll,
            debug: self.debug,
        }
    }
}

impl<C, S, J, L> AppState<C, S, J, L>
where
    C: ThinqCloud + 'static,
    S: SessionStore + 'static,
    J: JeedomApi + 'static,
    L: LogControl + 'static,
{
    /// Build every service around a shared session service.
    pub fn new(session: Arc<SessionService<C, S>>, log: L) -> Self {
        Self {
            devices: Arc::new(DeviceService::new(Arc::clone(&session))),
            monitor: Arc::new(MonitorService::new(Arc::clone(&session))),
            commands: Arc::new(CommandService::new(Arc::clone(&session))),
            session,
            jeedom: None,
            log: Arc::new(log),
            poll: PollSettings::REST,
            debug: false,
        }
    }

    #[must_use]
    pub fn with_jeedom(mut self, jeedom: Arc<JeedomSync<C, S, J>>) -> Self {
        self.jeedom = Some(jeedom);
        self
    }

    #[must_use]
    pub fn with_poll_settings(mut self, poll: PollSettings) -> Self {
        self.poll = poll;
        self
    }

    #[must_use]
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Check the `jeedom_token` request header against the issued token.
    ///
    /// # Errors
    ///
    /// Returns an unauthorized error when the header is missing or wrong.
    pub async fn authorize(&self, headers: &HeaderMap) -> Result<(), BridgeError> {
        let presented = headers
            .get(TOKEN_KEY)
            .and_then(|value| value.to_str().ok());
        self.session.check_token(presented).await
    }
}
