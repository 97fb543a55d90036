//! AC command dispatch handlers.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::HeaderMap;
use serde_json::Value;

use thinq_bridge_app::ports::{JeedomApi, LogControl, SessionStore, ThinqCloud};

use crate::error::ApiError;
use crate::state::AppState;

/// `GET|POST /cmd/{cmd}/{id}`
pub async fn run<C, S, J, L>(
    State(state): State<AppState<C, S, J, L>>,
    headers: HeaderMap,
    Path((cmd, id)): Path<(String, String)>,
) -> Result<Json<Value>, ApiError>
where
    C: ThinqCloud + 'static,
    S: SessionStore + 'static,
    J: JeedomApi + 'static,
    L: LogControl + 'static,
{
    state.authorize(&headers).await?;
    let result = state.commands.dispatch(&cmd, &id, None).await?;
    Ok(Json(result))
}

/// `GET|POST /cmd/{cmd}/{id}/{arg}`
pub async fn run_with_arg<C, S, J, L>(
    State(state): State<AppState<C, S, J, L>>,
    headers: HeaderMap,
    Path((cmd, id, arg)): Path<(String, String, String)>,
) -> Result<Json<Value>, ApiError>
where
    C: ThinqCloud + 'static,
    S: SessionStore + 'static,
    J: JeedomApi + 'static,
    L: LogControl + 'static,
{
    state.authorize(&headers).await?;
    let result = state.commands.dispatch(&cmd, &id, Some(&arg)).await?;
    Ok(Json(result))
}
