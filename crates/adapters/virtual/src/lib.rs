//! # thinq-bridge-adapter-virtual
//!
//! Virtual LG cloud that provides simulated appliances for testing and
//! demonstration purposes.
//!
//! ## Provided devices
//!
//! | Device | Id | Behaviour |
//! |--------|----|-----------|
//! | Washer | `virtual-washer` | Running cycle counting down one minute per status |
//! | Air Conditioner | `virtual-ac` | Responds to `turn` / `set-temp` / `ac-config` |
//!
//! Login accepts any callback URL carrying `access_token` and
//! `refresh_token` query parameters, the way the LG login page redirects.
//! Every monitor needs `warmup` empty polls before it delivers data.
//!
//! ## Dependency rule
//!
//! Depends on `thinq-bridge-app` (port traits) and `thinq-bridge-domain` only.

mod devices;

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use serde_json::Value;
use url::Url;

use thinq_bridge_app::ports::{CloudSession, ThinqCloud};
use thinq_bridge_domain::command::DeviceCommand;
use thinq_bridge_domain::device::DeviceInfo;
use thinq_bridge_domain::error::{BridgeError, CloudError};
use thinq_bridge_domain::locale::Locale;
use thinq_bridge_domain::model::ModelInfo;
use thinq_bridge_domain::session::Credentials;

pub use devices::{VirtualAirConditioner, VirtualDevice, VirtualWasher};

const OAUTH_ROOT: &str = "https://virtual.lgthinq.local";

struct Work {
    device_id: String,
    polls: u32,
}

/// Simulated LG cloud.
pub struct VirtualCloud {
    devices: Vec<VirtualDevice>,
    warmup: u32,
    counter: AtomicU64,
    session_id: Mutex<Option<String>>,
    offline: Mutex<Vec<String>>,
    works: Mutex<HashMap<String, Work>>,
}

impl Default for VirtualCloud {
    fn default() -> Self {
        Self::new(vec![
            VirtualDevice::Washer(VirtualWasher::default()),
            VirtualDevice::AirConditioner(VirtualAirConditioner::default()),
        ])
    }
}

impl VirtualCloud {
    #[must_use]
    pub fn new(devices: Vec<VirtualDevice>) -> Self {
        Self {
            devices,
            warmup: 1,
            counter: AtomicU64::new(0),
            session_id: Mutex::new(None),
            offline: Mutex::new(Vec::new()),
            works: Mutex::new(HashMap::new()),
        }
    }

    /// Number of empty polls before a monitor delivers data.
    #[must_use]
    pub fn with_warmup(mut self, warmup: u32) -> Self {
        self.warmup = warmup;
        self
    }

    /// Invalidate the current session, as the real cloud does after a while.
    pub fn expire_session(&self) {
        *lock(&self.session_id) = None;
    }

    /// Mark a device as disconnected (or reconnected).
    pub fn set_online(&self, device_id: &str, online: bool) {
        let mut offline = lock(&self.offline);
        offline.retain(|id| id != device_id);
        if !online {
            offline.push(device_id.to_string());
        }
    }

    /// Number of monitors started and not stopped yet.
    #[must_use]
    pub fn active_monitors(&self) -> usize {
        lock(&self.works).len()
    }

    fn next(&self) -> u64 {
        self.counter.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn check(&self, session: &CloudSession) -> Result<(), CloudError> {
        match lock(&self.session_id).as_deref() {
            Some(current) if current == session.session_id => Ok(()),
            _ => Err(CloudError::NotLoggedIn),
        }
    }

    fn device(&self, device_id: &str) -> Result<&VirtualDevice, CloudError> {
        self.devices
            .iter()
            .find(|device| device.info().id == device_id)
            .ok_or_else(|| CloudError::Api {
                code: "0106".to_string(),
                message: format!("unknown device {device_id}"),
            })
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn query_param(url: &Url, name: &str) -> Option<String> {
    url.query_pairs()
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.into_owned())
        .filter(|value| !value.is_empty())
}

fn bad_url(err: url::ParseError) -> BridgeError {
    CloudError::Api {
        code: "0102".to_string(),
        message: format!("invalid URL: {err}"),
    }
    .into()
}

impl ThinqCloud for VirtualCloud {
    async fn oauth_url(&self, locale: &Locale) -> Result<String, BridgeError> {
        let redirect_uri = format!("{OAUTH_ROOT}/login/iabClose");
        let url = Url::parse_with_params(
            &format!("{OAUTH_ROOT}/login/signIn"),
            &[
                ("country", locale.country.as_str()),
                ("language", locale.language.as_str()),
                ("svc_list", "SVC202"),
                ("division", "ha"),
                ("redirect_uri", redirect_uri.as_str()),
            ],
        )
        .map_err(bad_url)?;
        Ok(url.into())
    }

    async fn login(&self, locale: &Locale, callback_url: &str) -> Result<Credentials, BridgeError> {
        let callback = Url::parse(callback_url).map_err(bad_url)?;
        let (Some(access_token), Some(refresh_token)) = (
            query_param(&callback, "access_token"),
            query_param(&callback, "refresh_token"),
        ) else {
            return Err(CloudError::Api {
                code: "0102".to_string(),
                message: "callback URL carries no tokens".to_string(),
            }
            .into());
        };
        tracing::debug!(country = %locale.country, "virtual login");
        Ok(Credentials {
            access_token,
            refresh_token,
            oauth_root: query_param(&callback, "oauth2_backend_url")
                .unwrap_or_else(|| OAUTH_ROOT.to_string()),
        })
    }

    async fn refresh(
        &self,
        locale: &Locale,
        credentials: &Credentials,
    ) -> Result<CloudSession, BridgeError> {
        if credentials.refresh_token.is_empty() {
            return Err(CloudError::NotAuthenticated.into());
        }
        let session_id = format!("virtual-session-{}", self.next());
        *lock(&self.session_id) = Some(session_id.clone());
        Ok(CloudSession {
            locale: locale.clone(),
            credentials: Credentials {
                access_token: format!("virtual-access-{}", self.next()),
                ..credentials.clone()
            },
            session_id,
        })
    }

    async fn devices(&self, session: &CloudSession) -> Result<Vec<DeviceInfo>, BridgeError> {
        self.check(session)?;
        Ok(self.devices.iter().map(VirtualDevice::info).collect())
    }

    async fn model_info(
        &self,
        session: &CloudSession,
        device: &DeviceInfo,
    ) -> Result<ModelInfo, BridgeError> {
        self.check(session)?;
        Ok(self.device(&device.id)?.model())
    }

    async fn monitor_start(
        &self,
        session: &CloudSession,
        device_id: &str,
    ) -> Result<String, BridgeError> {
        self.check(session)?;
        self.device(device_id)?;
        if lock(&self.offline).iter().any(|id| id == device_id) {
            return Err(CloudError::NotConnected(device_id.to_string()).into());
        }
        let work_id = format!("work-{}", self.next());
        lock(&self.works).insert(
            work_id.clone(),
            Work {
                device_id: device_id.to_string(),
                polls: 0,
            },
        );
        Ok(work_id)
    }

    async fn monitor_poll(
        &self,
        session: &CloudSession,
        device_id: &str,
        work_id: &str,
    ) -> Result<Option<Vec<u8>>, BridgeError> {
        self.check(session)?;
        let mut works = lock(&self.works);
        let work = works
            .get_mut(work_id)
            .filter(|work| work.device_id == device_id)
            .ok_or_else(|| CloudError::Api {
                code: "0106".to_string(),
                message: format!("unknown work id {work_id}"),
            })?;
        work.polls += 1;
        if work.polls <= self.warmup {
            return Ok(None);
        }
        let snapshot = self.device(device_id)?.snapshot();
        Ok(Some(snapshot.to_string().into_bytes()))
    }

    async fn monitor_stop(
        &self,
        _session: &CloudSession,
        _device_id: &str,
        work_id: &str,
    ) -> Result<(), BridgeError> {
        lock(&self.works).remove(work_id);
        Ok(())
    }

    async fn send_command(
        &self,
        session: &CloudSession,
        device_id: &str,
        command: DeviceCommand,
    ) -> Result<(), BridgeError> {
        self.check(session)?;
        self.device(device_id)?.apply(command)?;
        Ok(())
    }

    async fn ac_config(&self, session: &CloudSession, device_id: &str) -> Result<Value, BridgeError> {
        self.check(session)?;
        Ok(self.device(device_id)?.config()?)
    }
}
