//! Command service: the `/cmd/{name}/{device}/{arg}` dispatch table.

use std::sync::Arc;

use serde_json::{Value, json};

use thinq_bridge_domain::command::Dispatch;
use thinq_bridge_domain::error::{BridgeError, ValidationError};

use crate::ports::{SessionStore, ThinqCloud};
use crate::services::device_service::DeviceService;
use crate::services::session_service::SessionService;

/// Application service dispatching control commands to AC devices.
pub struct CommandService<C, S> {
    session: Arc<SessionService<C, S>>,
    devices: DeviceService<C, S>,
}

impl<C: ThinqCloud, S: SessionStore> CommandService<C, S> {
    pub fn new(session: Arc<SessionService<C, S>>) -> Self {
        Self {
            devices: DeviceService::new(Arc::clone(&session)),
            session,
        }
    }

    /// Run command `name` against `device_id`.
    ///
    /// # Errors
    ///
    /// - [`BridgeError::NotFound`] for an unknown command or device
    /// - [`BridgeError::Validation`] for a bad argument or a non-AC device
    /// - the cloud error otherwise
    #[tracing::instrument(skip(self))]
    pub async fn dispatch(
        &self,
        name: &str,
        device_id: &str,
        arg: Option<&str>,
    ) -> Result<Value, BridgeError> {
        let dispatch = Dispatch::parse(name, arg)?;

        let device = self.devices.find(device_id).await?;
        if !device.is_ac() {
            return Err(ValidationError::NotAnAcDevice(device_id.to_string()).into());
        }

        let cloud = self.session.cloud();
        match dispatch {
            Dispatch::Send(command) => {
                self.session
                    .with_session(|session| async move {
                        cloud.send_command(&session, device_id, command).await
                    })
                    .await?;
                tracing::info!(device = %device.name, ?command, "command sent");
                Ok(json!({"result": "ok", "command": name, "device": device_id}))
            }
            Dispatch::AcConfig => {
                self.session
                    .with_session(|session| async move { cloud.ac_config(&session, device_id).await })
                    .await
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeCloud, MemoryStore};
    use thinq_bridge_domain::command::DeviceCommand;

    async fn service() -> (
        CommandService<FakeCloud, MemoryStore>,
        Arc<SessionService<FakeCloud, MemoryStore>>,
    ) {
        let session = Arc::new(SessionService::new(
            FakeCloud::default(),
            MemoryStore::default(),
        ));
        session
            .authenticate("https://callback?code=ok")
            .await
            .unwrap();
        (CommandService::new(Arc::clone(&session)), session)
    }

    #[tokio::test]
    async fn should_send_temperature_to_ac() {
        let (svc, session) = service().await;
        let result = svc.dispatch("set-temp", "dev-ac", Some("70")).await.unwrap();

        assert_eq!(result["result"], "ok");
        assert_eq!(
            session.cloud().sent(),
            vec![(
                "dev-ac".to_string(),
                DeviceCommand::SetTemperature { fahrenheit: 70 }
            )]
        );
    }

    #[tokio::test]
    async fn should_turn_ac_on() {
        let (svc, session) = service().await;
        svc.dispatch("turn", "dev-ac", Some("on")).await.unwrap();
        assert_eq!(
            session.cloud().sent()[0].1,
            DeviceCommand::Power(true)
        );
    }

    #[tokio::test]
    async fn should_refuse_non_ac_device() {
        let (svc, session) = service().await;
        let result = svc.dispatch("turn", "dev-washer", Some("on")).await;
        assert!(matches!(
            result,
            Err(BridgeError::Validation(ValidationError::NotAnAcDevice(_)))
        ));
        assert!(session.cloud().sent().is_empty());
    }

    #[tokio::test]
    async fn should_report_unknown_device() {
        let (svc, _) = service().await;
        let result = svc.dispatch("turn", "nope", Some("on")).await;
        assert!(matches!(result, Err(BridgeError::NotFound(_))));
    }

    #[tokio::test]
    async fn should_validate_before_looking_up_device() {
        let (svc, _) = service().await;
        let result = svc.dispatch("set-temp", "nope", Some("hot")).await;
        assert!(matches!(result, Err(BridgeError::Validation(_))));
    }

    #[tokio::test]
    async fn should_read_ac_config() {
        let (svc, _) = service().await;
        let config = svc.dispatch("ac-config", "dev-ac", None).await.unwrap();
        assert_eq!(config["power"], 1200);
    }
}
