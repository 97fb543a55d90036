//! # thinq-bridge-adapter-jeedom
//!
//! Client for the Jeedom JSON-RPC API (`/core/api/jeeApi.php`).
//!
//! Every call is a JSON-RPC 2.0 request whose `params` carry the API key.
//! Only the four methods the bridge needs are exposed, through the
//! [`JeedomApi`] port:
//!
//! | Port method | JSON-RPC method |
//! |-------------|-----------------|
//! | `config_by_key` | `config::byKey` |
//! | `eq_logics_by_type` | `eqLogic::byType` |
//! | `commands_by_eq_logic` | `cmd::byEqLogicId` |
//! | `command_event` | `cmd::event` |

pub mod error;

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value, json};

use thinq_bridge_app::ports::JeedomApi;
use thinq_bridge_domain::error::BridgeError;
use thinq_bridge_domain::jeedom::{EqLogicRecord, JeedomCommand};

use crate::error::JeedomClientError;

const API_PATH: &str = "/core/api/jeeApi.php";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<RpcError>,
}

#[derive(Deserialize)]
struct RpcError {
    code: i64,
    #[serde(default)]
    message: String,
}

/// JSON-RPC client bound to one Jeedom instance.
pub struct JeedomClient {
    client: reqwest::Client,
    url: String,
    api_key: String,
    next_id: AtomicU64,
}

impl JeedomClient {
    /// Create a client for the Jeedom at `address` (`host`, `host:port` or a
    /// full `http(s)://` base URL).
    ///
    /// # Errors
    ///
    /// Returns [`JeedomClientError::Build`] when the HTTP client cannot be
    /// built.
    pub fn new(address: &str, api_key: impl Into<String>) -> Result<Self, JeedomClientError> {
        let client = reqwest::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .map_err(JeedomClientError::Build)?;
        Ok(Self {
            client,
            url: endpoint(address),
            api_key: api_key.into(),
            next_id: AtomicU64::new(1),
        })
    }

    /// The `jeeApi.php` URL requests are posted to.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Call `method` and decode its `result`.
    ///
    /// # Errors
    ///
    /// Returns a transport, HTTP status, JSON-RPC or decoding error.
    #[tracing::instrument(skip(self, params), fields(url = %self.url))]
    pub async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        mut params: Map<String, Value>,
    ) -> Result<T, JeedomClientError> {
        params.insert("apikey".to_string(), Value::String(self.api_key.clone()));
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let body = json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
            "params": params,
        });

        let response = self.client.post(&self.url).json(&body).send().await?;
        let status = response.status();
        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "jeedom answered with an error status");
            return Err(JeedomClientError::Status(status.as_u16()));
        }

        let response: RpcResponse = response.json().await?;
        if let Some(RpcError { code, message }) = response.error {
            tracing::debug!(code, %message, "jeedom rpc error");
            return Err(JeedomClientError::Rpc { code, message });
        }
        Ok(serde_json::from_value(
            response.result.unwrap_or(Value::Null),
        )?)
    }
}

fn endpoint(address: &str) -> String {
    let base = address.trim().trim_end_matches('/');
    let base = if base.starts_with("http://") || base.starts_with("https://") {
        base.to_string()
    } else {
        format!("http://{base}")
    };
    if base.ends_with(API_PATH) {
        base
    } else {
        format!("{base}{API_PATH}")
    }
}

fn params<const N: usize>(pairs: [(&str, Value); N]) -> Map<String, Value> {
    pairs
        .into_iter()
        .map(|(key, value)| (key.to_string(), value))
        .collect()
}

impl JeedomApi for JeedomClient {
    async fn config_by_key(&self, key: &str, plugin: &str) -> Result<Value, BridgeError> {
        Ok(self
            .call(
                "config::byKey",
                params([("key", json!(key)), ("plugin", json!(plugin))]),
            )
            .await?)
    }

    async fn eq_logics_by_type(&self, plugin: &str) -> Result<Vec<EqLogicRecord>, BridgeError> {
        Ok(self
            .call("eqLogic::byType", params([("type", json!(plugin))]))
            .await?)
    }

    async fn commands_by_eq_logic(
        &self,
        eq_logic_id: &str,
    ) -> Result<Vec<JeedomCommand>, BridgeError> {
        Ok(self
            .call(
                "cmd::byEqLogicId",
                params([("eqLogic_id", json!(eq_logic_id))]),
            )
            .await?)
    }

    async fn command_event(&self, command_id: &str, value: &Value) -> Result<(), BridgeError> {
        let _: Value = self
            .call(
                "cmd::event",
                params([("id", json!(command_id)), ("value", value.clone())]),
            )
            .await?;
        Ok(())
    }
}
