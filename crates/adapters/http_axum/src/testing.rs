//! Stub ports and request helpers shared by the router tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, Response};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use thinq_bridge_adapter_virtual::{VirtualCloud, VirtualWasher};
use thinq_bridge_app::ports::{JeedomApi, LogControl, SessionStore};
use thinq_bridge_app::services::jeedom_sync::JeedomSync;
use thinq_bridge_app::services::monitor_service::{MonitorService, PollSettings};
use thinq_bridge_app::services::session_service::SessionService;
use thinq_bridge_domain::error::{BridgeError, JeedomError};
use thinq_bridge_domain::jeedom::{EqLogicRecord, JeedomCommand};
use thinq_bridge_domain::log_level::LogLevel;
use thinq_bridge_domain::session::SessionState;

use crate::state::AppState;

pub const CALLBACK: &str =
    "https://virtual.lgthinq.local/login/iabClose?access_token=abc&refresh_token=def";

pub const FAST: PollSettings = PollSettings {
    interval: std::time::Duration::ZERO,
    max_polls: 3,
};

pub type TestState = AppState<VirtualCloud, MemoryStore, StubJeedom, RecordingLog>;

#[derive(Clone, Default)]
pub struct MemoryStore {
    pub files: Arc<Mutex<HashMap<String, SessionState>>>,
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

/// Jeedom with one enabled eqLogic bound to the virtual washer.
#[derive(Default)]
pub struct StubJeedom {
    pub events: Mutex<Vec<(String, Value)>>,
}

impl JeedomApi for StubJeedom {
    async fn config_by_key(&self, key: &str, _plugin: &str) -> Result<Value, BridgeError> {
        match key {
            "name" => Ok(json!("Maison")),
            _ => Err(JeedomError::Rpc {
                code: -32699,
                message: format!("unknown key {key}"),
            }
            .into()),
        }
    }

    async fn eq_logics_by_type(&self, _plugin: &str) -> Result<Vec<EqLogicRecord>, BridgeError> {
        Ok(serde_json::from_value(json!([
            {"id": "7", "logicalId": VirtualWasher::ID, "name": "Lave-linge", "isEnable": "1"}
        ]))
        .unwrap())
    }

    async fn commands_by_eq_logic(
        &self,
        _eq_logic_id: &str,
    ) -> Result<Vec<JeedomCommand>, BridgeError> {
        Ok(serde_json::from_value(json!([
            {"id": "70", "logicalId": "State", "name": "Etat"}
        ]))
        .unwrap())
    }

    async fn command_event(&self, command_id: &str, value: &Value) -> Result<(), BridgeError> {
        self.events
            .lock()
            .unwrap()
            .push((command_id.to_string(), value.clone()));
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingLog {
    pub level: Mutex<Option<LogLevel>>,
}

impl LogControl for RecordingLog {
    fn set_level(&self, level: LogLevel) -> Result<(), BridgeError> {
        *self.level.lock().unwrap() = Some(level);
        Ok(())
    }
}

/// State over the virtual cloud, not logged in, without Jeedom.
pub fn state() -> TestState {
    let session = Arc::new(SessionService::new(
        VirtualCloud::default(),
        MemoryStore::default(),
    ));
    AppState::new(session, RecordingLog::default()).with_poll_settings(FAST)
}

/// Same as [`state`] with the stub Jeedom attached.
pub fn state_with_jeedom() -> TestState {
    let state = state();
    let monitor = MonitorService::new(Arc::clone(&state.session));
    let sync = JeedomSync::new(StubJeedom::default(), monitor).with_settings(FAST);
    state.with_jeedom(Arc::new(sync))
}

/// Log in and return the issued `jeedom_token`.
pub async fn login(state: &TestState) -> String {
    state.session.authenticate(CALLBACK).await.unwrap()
}

pub async fn send(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
) -> Response<Body> {
    let mut request = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        request = request.header("jeedom_token", token);
    }
    app.oneshot(request.body(Body::empty()).unwrap())
        .await
        .unwrap()
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
