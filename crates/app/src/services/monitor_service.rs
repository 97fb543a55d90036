//! Monitor service: the device-state polling loop.
//!
//! One monitoring cycle starts a cloud monitor, polls it a bounded number of
//! times with a fixed interval, decodes the first usable payload and always
//! stops the monitor again. An expired session restarts the whole cycle once
//! after a refresh.

use std::sync::Arc;
use std::time::Duration;

use thinq_bridge_domain::device::DeviceInfo;
use thinq_bridge_domain::error::{BridgeError, CloudError, NotFoundError};
use thinq_bridge_domain::model::{DeviceStatus, ModelInfo};

use crate::ports::{CloudSession, SessionStore, ThinqCloud};
use crate::services::session_service::SessionService;

/// Poll interval and bound of a monitoring cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSettings {
    pub interval: Duration,
    pub max_polls: u32,
}

impl PollSettings {
    /// Used by the REST surface.
    pub const REST: Self = Self {
        interval: Duration::from_secs(1),
        max_polls: 10,
    };

    /// Used by the Jeedom synchronisation.
    pub const JEEDOM: Self = Self {
        interval: Duration::from_secs(1),
        max_polls: 5,
    };
}

impl Default for PollSettings {
    fn default() -> Self {
        Self::REST
    }
}

/// Application service monitoring a single device.
pub struct MonitorService<C, S> {
    session: Arc<SessionService<C, S>>,
}

impl<C, S> Clone for MonitorService<C, S> {
    fn clone(&self) -> Self {
        Self {
            session: Arc::clone(&self.session),
        }
    }
}

impl<C: ThinqCloud, S: SessionStore> MonitorService<C, S> {
    pub fn new(session: Arc<SessionService<C, S>>) -> Self {
        Self { session }
    }

    /// Monitor `device_id` and return its decoded status.
    ///
    /// # Errors
    ///
    /// - [`BridgeError::NotFound`] when the device does not exist
    /// - [`CloudError::NotConnected`] when the device is offline
    /// - [`CloudError::NoResponse`] when no poll produced usable data
    /// - the session error when the retry after a refresh also expired
    #[tracing::instrument(skip(self))]
    pub async fn monitor(
        &self,
        device_id: &str,
        settings: PollSettings,
    ) -> Result<DeviceStatus, BridgeError> {
        let (device, model) = self.describe(device_id).await?;

        match self.cycle(&device, &model, settings).await {
            Err(err) if err.is_session_expired() => {
                tracing::info!(device = %device.name, "session expired while monitoring, refreshing");
                self.session.refresh().await?;
                self.cycle(&device, &model, settings).await
            }
            other => other,
        }
    }

    async fn describe(&self, device_id: &str) -> Result<(DeviceInfo, ModelInfo), BridgeError> {
        let cloud = self.session.cloud();
        self.session
            .with_session(|session| async move {
                let device = cloud
                    .devices(&session)
                    .await?
                    .into_iter()
                    .find(|device| device.id == device_id)
                    .ok_or_else(|| NotFoundError {
                        entity: "device",
                        id: device_id.to_string(),
                    })?;
                let model = cloud.model_info(&session, &device).await?;
                Ok((device, model))
            })
            .await
    }

    async fn cycle(
        &self,
        device: &DeviceInfo,
        model: &ModelInfo,
        settings: PollSettings,
    ) -> Result<DeviceStatus, BridgeError> {
        let cloud = self.session.cloud();
        let session = self.session.session().await?;

        let work_id = match cloud.monitor_start(&session, &device.id).await {
            Ok(work_id) => work_id,
            Err(BridgeError::Cloud(CloudError::NotConnected(_))) => {
                tracing::warn!(device = %device.name, "device not connected");
                return Err(CloudError::NotConnected(device.name.clone()).into());
            }
            Err(err) => return Err(err),
        };

        let result = self
            .poll(&session, device, model, &work_id, settings)
            .await;

        if let Err(err) = cloud.monitor_stop(&session, &device.id, &work_id).await {
            tracing::warn!(device = %device.name, error = %err.message(), "failed to stop monitor");
        }
        result
    }

    async fn poll(
        &self,
        session: &CloudSession,
        device: &DeviceInfo,
        model: &ModelInfo,
        work_id: &str,
        settings: PollSettings,
    ) -> Result<DeviceStatus, BridgeError> {
        let cloud = self.session.cloud();
        for attempt in 1..=settings.max_polls {
            tokio::time::sleep(settings.interval).await;
            match cloud.monitor_poll(session, &device.id, work_id).await? {
                Some(payload) => match model.decode_monitor(&payload) {
                    Ok(status) => {
                        tracing::debug!(device = %device.name, attempt, "status decoded");
                        return Ok(status);
                    }
                    Err(err) => {
                        tracing::error!(
                            device = %device.name,
                            error = %err,
                            data = %String::from_utf8_lossy(&payload),
                            "undecodable status data"
                        );
                    }
                },
                None => {
                    tracing::debug!(device = %device.name, kind = %device.device_type, attempt, "no state, try again");
                }
            }
        }
        tracing::warn!(
            device = %device.name,
            kind = %device.device_type,
            tries = settings.max_polls,
            "timeout, device unreachable"
        );
        Err(CloudError::NoResponse.into())
    }
}
