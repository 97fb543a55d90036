//! In-memory port implementations shared by the service tests.

use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use serde_json::Value;

use thinq_bridge_domain::command::DeviceCommand;
use thinq_bridge_domain::device::{DeviceInfo, DeviceType};
use thinq_bridge_domain::error::{BridgeError, CloudError, JeedomError};
use thinq_bridge_domain::jeedom::{EqLogicRecord, JeedomCommand};
use thinq_bridge_domain::locale::Locale;
use thinq_bridge_domain::model::{ModelInfo, ValueDescriptor};
use thinq_bridge_domain::session::{Credentials, SessionState};

use crate::ports::{CloudSession, JeedomApi, SessionStore, ThinqCloud};

/// Scripted answer of [`FakeCloud::monitor_poll`].
#[derive(Debug, Clone)]
pub enum PollReply {
    Empty,
    Data(&'static str),
    Expired,
}

#[derive(Default)]
pub struct FakeCloud {
    expired_calls: AtomicUsize,
    refreshes: AtomicUsize,
    starts: AtomicUsize,
    stops: AtomicUsize,
    polls: AtomicUsize,
    replies: Mutex<VecDeque<PollReply>>,
    disconnected: Mutex<HashSet<String>>,
    sent: Mutex<Vec<(String, DeviceCommand)>>,
}

impl FakeCloud {
    /// Make the next `n` session-bound calls fail with an expired session.
    pub fn expire_sessions(&self, n: usize) {
        self.expired_calls.store(n, Ordering::SeqCst);
    }

    pub fn script(&self, replies: impl IntoIterator<Item = PollReply>) {
        self.replies.lock().unwrap().extend(replies);
    }

    pub fn disconnect(&self, device_id: &str) {
        self.disconnected
            .lock()
            .unwrap()
            .insert(device_id.to_string());
    }

    pub fn refresh_count(&self) -> usize {
        self.refreshes.load(Ordering::SeqCst)
    }

    pub fn start_count(&self) -> usize {
        self.starts.load(Ordering::SeqCst)
    }

    pub fn stop_count(&self) -> usize {
        self.stops.load(Ordering::SeqCst)
    }

    pub fn poll_count(&self) -> usize {
        self.polls.load(Ordering::SeqCst)
    }

    pub fn sent(&self) -> Vec<(String, DeviceCommand)> {
        self.sent.lock().unwrap().clone()
    }

    fn check_session(&self) -> Result<(), BridgeError> {
        let consumed = self
            .expired_calls
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1));
        if consumed.is_ok() {
            return Err(CloudError::NotLoggedIn.into());
        }
        Ok(())
    }
}

pub fn washer() -> DeviceInfo {
    DeviceInfo {
        id: "dev-washer".to_string(),
        name: "WASHER".to_string(),
        device_type: DeviceType::Washer,
        model: "F3L2CYV5W_WIFI".to_string(),
    }
}

pub fn air_conditioner() -> DeviceInfo {
    DeviceInfo {
        id: "dev-ac".to_string(),
        name: "AC".to_string(),
        device_type: DeviceType::Ac,
        model: "RAC_056905_WW".to_string(),
    }
}

pub fn washer_model() -> ModelInfo {
    let mut values = BTreeMap::new();
    values.insert(
        "State".to_string(),
        ValueDescriptor::Enum {
            options: BTreeMap::from([
                ("0".to_string(), "POWER_OFF".to_string()),
                ("30".to_string(), "RUNNING".to_string()),
            ]),
        },
    );
    values.insert(
        "Remain_Time_M".to_string(),
        ValueDescriptor::Range {
            min: 0,
            max: 59,
            step: 1,
        },
    );
    ModelInfo { values }
}

impl ThinqCloud for FakeCloud {
    async fn oauth_url(&self, locale: &Locale) -> Result<String, BridgeError> {
        Ok(format!(
            "https://fake.lgthinq.com/login?country={}&language={}",
            locale.country, locale.language
        ))
    }

    async fn login(&self, _locale: &Locale, callback_url: &str) -> Result<Credentials, BridgeError> {
        if !callback_url.contains("code=") {
            return Err(CloudError::Api {
                code: "0102".to_string(),
                message: "invalid callback".to_string(),
            }
            .into());
        }
        Ok(Credentials {
            access_token: "access".to_string(),
            refresh_token: "refresh".to_string(),
            oauth_root: "https://fake.lgthinq.com".to_string(),
        })
    }

    async fn refresh(
        &self,
        locale: &Locale,
        credentials: &Credentials,
    ) -> Result<CloudSession, BridgeError> {
        let n = self.refreshes.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(CloudSession {
            locale: locale.clone(),
            credentials: credentials.clone(),
            session_id: format!("session-{n}"),
        })
    }

    async fn devices(&self, _session: &CloudSession) -> Result<Vec<DeviceInfo>, BridgeError> {
        self.check_session()?;
        Ok(vec![washer(), air_conditioner()])
    }

    async fn model_info(
        &self,
        _session: &CloudSession,
        _device: &DeviceInfo,
    ) -> Result<ModelInfo, BridgeError> {
        self.check_session()?;
        Ok(washer_model())
    }

    async fn monitor_start(
        &self,
        _session: &CloudSession,
        device_id: &str,
    ) -> Result<String, BridgeError> {
        self.check_session()?;
        if self.disconnected.lock().unwrap().contains(device_id) {
            return Err(CloudError::NotConnected(device_id.to_string()).into());
        }
        let n = self.starts.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(format!("work-{n}"))
    }

    async fn monitor_poll(
        &self,
        _session: &CloudSession,
        _device_id: &str,
        _work_id: &str,
    ) -> Result<Option<Vec<u8>>, BridgeError> {
        self.polls.fetch_add(1, Ordering::SeqCst);
        let reply = self.replies.lock().unwrap().pop_front();
        match reply {
            Some(PollReply::Data(data)) => Ok(Some(data.as_bytes().to_vec())),
            Some(PollReply::Expired) => Err(CloudError::NotLoggedIn.into()),
            Some(PollReply::Empty) | None => Ok(None),
        }
    }

    async fn monitor_stop(
        &self,
        _session: &CloudSession,
        _device_id: &str,
        _work_id: &str,
    ) -> Result<(), BridgeError> {
        self.stops.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn send_command(
        &self,
        _session: &CloudSession,
        device_id: &str,
        command: DeviceCommand,
    ) -> Result<(), BridgeError> {
        self.check_session()?;
        self.sent
            .lock()
            .unwrap()
            .push((device_id.to_string(), command));
        Ok(())
    }

    async fn ac_config(
        &self,
        _session: &CloudSession,
        _device_id: &str,
    ) -> Result<Value, BridgeError> {
        self.check_session()?;
        Ok(serde_json::json!({"filter": "OK", "power": 1200}))
    }
}

#[derive(Clone, Default)]
pub struct MemoryStore {
    files: Arc<Mutex<HashMap<String, SessionState>>>,
}

impl SessionStore for MemoryStore {
    async fn load(&self, name: &str) -> Result<Option<SessionState>, BridgeError> {
        Ok(self.files.lock().unwrap().get(name).cloned())
    }

    async fn save(&self, name: &str, state: &SessionState) -> Result<String, BridgeError> {
        self.files
            .lock()
            .unwrap()
            .insert(name.to_string(), state.clone());
        Ok(format!("/memory/{name}"))
    }
}

#[derive(Default)]
pub struct FakeJeedom {
    pub config: HashMap<String, Value>,
    pub eq_logics: Vec<EqLogicRecord>,
    pub commands: HashMap<String, Vec<JeedomCommand>>,
    pub events: Mutex<Vec<(String, Value)>>,
    pub eq_logic_calls: AtomicUsize,
}

impl FakeJeedom {
    pub fn events(&self) -> Vec<(String, Value)> {
        self.events.lock().unwrap().clone()
    }
}

impl JeedomApi for FakeJeedom {
    async fn config_by_key(&self, key: &str, _plugin: &str) -> Result<Value, BridgeError> {
        self.config.get(key).cloned().ok_or_else(|| {
            JeedomError::Rpc {
                code: -32699,
                message: format!("unknown key {key}"),
            }
            .into()
        })
    }

    async fn eq_logics_by_type(&self, _plugin: &str) -> Result<Vec<EqLogicRecord>, BridgeError> {
        self.eq_logic_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.eq_logics.clone())
    }

    async fn commands_by_eq_logic(
        &self,
        eq_logic_id: &str,
    ) -> Result<Vec<JeedomCommand>, BridgeError> {
        Ok(self.commands.get(eq_logic_id).cloned().unwrap_or_default())
    }

    async fn command_event(&self, command_id: &str, value: &Value) -> Result<(), BridgeError> {
        self.events
            .lock()
            .unwrap()
            .push((command_id.to_string(), value.clone()));
        Ok(())
    }
}
