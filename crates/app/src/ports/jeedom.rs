//! Jeedom port: the few JSON-RPC methods the bridge needs.

use std::future::Future;

use serde_json::Value;

use thinq_bridge_domain::error::BridgeError;
use thinq_bridge_domain::jeedom::{EqLogicRecord, JeedomCommand};

pub trait JeedomApi: Send + Sync {
    /// `config::byKey`: a configuration value of `plugin`.
    fn config_by_key(
        &self,
        key: &str,
        plugin: &str,
    ) -> impl Future<Output = Result<Value, BridgeError>> + Send;

    /// `eqLogic::byType`: every eqLogic registered by `plugin`.
    fn eq_logics_by_type(
        &self,
        plugin: &str,
    ) -> impl Future<Output = Result<Vec<EqLogicRecord>, BridgeError>> + Send;

    /// `cmd::byEqLogicId`: commands of an eqLogic.
    fn commands_by_eq_logic(
        &self,
        eq_logic_id: &str,
    ) -> impl Future<Output = Result<Vec<JeedomCommand>, BridgeError>> + Send;

    /// `cmd::event`: push a new value for a command.
    fn command_event(
        &self,
        command_id: &str,
        value: &Value,
    ) -> impl Future<Output = Result<(), BridgeError>> + Send;
}
