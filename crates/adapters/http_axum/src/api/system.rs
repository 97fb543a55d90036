//! Liveness, log level and fallback handlers.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::{StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use serde_json::json;

use thinq_bridge_app::ports::{JeedomApi, LogControl, SessionStore, ThinqCloud};
use thinq_bridge_domain::error::BridgeError;
use thinq_bridge_domain::log_level::LogLevel;
use thinq_bridge_domain::time::epoch_seconds;

use crate::error::ApiError;
use crate::state::AppState;

/// Body of `GET /ping`.
#[derive(Debug, Serialize)]
pub struct Ping {
    pub state: &'static str,
    pub starting: f64,
    pub jeedom_token: bool,
}

/// Body of `GET /`.
#[derive(Debug, Serialize)]
pub struct Banner {
    pub msg: &'static str,
    pub starting: f64,
    pub debug: bool,
}

/// `GET /`
pub async fn banner<C, S, J, L>(State(state): State<AppState<C, S, J, L>>) -> Json<Banner>
where
    C: ThinqCloud + 'static,
    S: SessionStore + 'static,
    J: JeedomApi + 'static,
    L: LogControl + 'static,
{
    Json(Banner {
        msg: "thinq-bridge is alive",
        starting: epoch_seconds(state.session.starting()),
        debug: state.debug,
    })
}

/// `GET /ping`
pub async fn ping<C, S, J, L>(State(state): State<AppState<C, S, J, L>>) -> Json<Ping>
where
    C: ThinqCloud + 'static,
    S: SessionStore + 'static,
    J: JeedomApi + 'static,
    L: LogControl + 'static,
{
    Json(Ping {
        state: "ok",
        starting: epoch_seconds(state.session.starting()),
        jeedom_token: state.session.has_token().await,
    })
}

/// `GET|POST /log/{level}`
pub async fn set_log_level<C, S, J, L>(
    State(state): State<AppState<C, S, J, L>>,
    Path(level): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError>
where
    C: ThinqCloud + 'static,
    S: SessionStore + 'static,
    J: JeedomApi + 'static,
    L: LogControl + 'static,
{
    let level: LogLevel = level.parse().map_err(BridgeError::from)?;
    state.log.set_level(level)?;
    tracing::info!(%level, "log level changed");
    Ok(Json(json!({"log": level.as_str(), "result": "ok"})))
}

/// Fallback for every unknown route.
pub async fn not_found(uri: Uri) -> Response {
    tracing::debug!(%uri, "route not found");
    (
        StatusCode::NOT_FOUND,
        Json(json!({"msg": "Error 404 page not found!", "url": uri.to_string()})),
    )
        .into_response()
}
