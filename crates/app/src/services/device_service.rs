//! Device service: listing and lookup of the account's appliances.

use std::sync::Arc;

use thinq_bridge_domain::device::DeviceInfo;
use thinq_bridge_domain::error::{BridgeError, CloudError, NotFoundError};

use crate::ports::{SessionStore, ThinqCloud};
use crate::services::session_service::SessionService;

/// How many times `/ls` refreshes an expired session before giving up.
pub const LIST_ATTEMPTS: u32 = 10;

/// Application service for device listing.
pub struct DeviceService<C, S> {
    session: Arc<SessionService<C, S>>,
    attempts: u32,
}

impl<C: ThinqCloud, S: SessionStore> DeviceService<C, S> {
    pub fn new(session: Arc<SessionService<C, S>>) -> Self {
        Self {
            session,
            attempts: LIST_ATTEMPTS,
        }
    }

    #[must_use]
    pub fn with_attempts(mut self, attempts: u32) -> Self {
        self.attempts = attempts.max(1);
        self
    }

    /// List the user's devices, refreshing the session while it reports
    /// being expired.
    ///
    /// # Errors
    ///
    /// Returns [`CloudError::NoResponse`] once every attempt hit an expired
    /// session, or any other cloud error as is.
    #[tracing::instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<DeviceInfo>, BridgeError> {
        let mut session = self.session.session().await?;
        for attempt in 1..=self.attempts {
            match self.session.cloud().devices(&session).await {
                Ok(devices) => {
                    for device in &devices {
                        tracing::debug!(
                            id = %device.id,
                            name = %device.name,
                            kind = %device.device_type,
                            model = %device.model,
                            "device"
                        );
                    }
                    tracing::debug!(count = devices.len(), "devices listed");
                    return Ok(devices);
                }
                Err(err) if err.is_session_expired() => {
                    tracing::info!(attempt, "Session expired.");
                    session = self.session.refresh().await?;
                }
                Err(err) => return Err(err),
            }
        }
        Err(CloudError::NoResponse.into())
    }

    /// Find a device by id.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::NotFound`] when the account has no such device.
    pub async fn find(&self, device_id: &str) -> Result<DeviceInfo, BridgeError> {
        let cloud = self.session.cloud();
        let devices = self
            .session
            .with_session(|session| async move { cloud.devices(&session).await })
            .await?;
        devices
            .into_iter()
            .find(|device| device.id == device_id)
            .ok_or_else(|| {
                NotFoundError {
                    entity: "device",
                    id: device_id.to_string(),
                }
                .into()
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeCloud, MemoryStore};

    async fn logged_in() -> Arc<SessionService<FakeCloud, MemoryStore>> {
        let session = Arc::new(SessionService::new(
            FakeCloud::default(),
            MemoryStore::default(),
        ));
        session
            .authenticate("https://callback?code=ok")
            .await
            .unwrap();
        session
    }

    #[tokio::test]
    async fn should_list_devices() {
        let svc = DeviceService::new(logged_in().await);
        let devices = svc.list().await.unwrap();
        assert_eq!(devices.len(), 2);
        assert_eq!(devices[0].id, "dev-washer");
    }

    #[tokio::test]
    async fn should_refresh_until_session_is_valid() {
        let session = logged_in().await;
        session.cloud().expire_sessions(3);
        let svc = DeviceService::new(Arc::clone(&session));

        let devices = svc.list().await.unwrap();
        assert_eq!(devices.len(), 2);
        assert_eq!(session.cloud().refresh_count(), 4);
    }

    #[tokio::test]
    async fn should_give_up_after_all_attempts() {
        let session = logged_in().await;
        session.cloud().expire_sessions(100);
        let svc = DeviceService::new(session).with_attempts(3);

        let result = svc.list().await;
        assert!(matches!(
            result,
            Err(BridgeError::Cloud(CloudError::NoResponse))
        ));
    }

    #[tokio::test]
    async fn should_fail_before_login() {
        let session = Arc::new(SessionService::new(
            FakeCloud::default(),
            MemoryStore::default(),
        ));
        let result = DeviceService::new(session).list().await;
        assert!(matches!(
            result,
            Err(BridgeError::Cloud(CloudError::NotAuthenticated))
        ));
    }

    #[tokio::test]
    async fn should_find_device_by_id() {
        let svc = DeviceService::new(logged_in().await);
        assert_eq!(svc.find("dev-ac").await.unwrap().name, "AC");
    }

    #[tokio::test]
    async fn should_report_unknown_device() {
        let svc = DeviceService::new(logged_in().await);
        let err = svc.find("nope").await.unwrap_err();
        assert_eq!(err.message(), "device \"nope\" not found");
    }
}
