//! Jeedom synchronisation handlers.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::HeaderMap;
use serde::Serialize;

use thinq_bridge_app::ports::{JeedomApi, LogControl, SessionStore, ThinqCloud};
use thinq_bridge_app::services::jeedom_sync::{JeedomSync, UpdateOutcome};
use thinq_bridge_domain::error::{BridgeError, JeedomError};

use crate::error::ApiError;
use crate::state::AppState;

/// Body of the update endpoints.
#[derive(Debug, Serialize)]
pub struct UpdateResponse {
    pub updated: Vec<UpdateOutcome>,
}

fn configured<C, S, J, L>(
    state: &AppState<C, S, J, L>,
) -> Result<Arc<JeedomSync<C, S, J>>, BridgeError> {
    state
        .jeedom
        .clone()
        .ok_or_else(|| JeedomError::NotConfigured.into())
}

/// `POST /jeedom/update`
pub async fn update_all<C, S, J, L>(
    State(state): State<AppState<C, S, J, L>>,
    headers: HeaderMap,
) -> Result<Json<UpdateResponse>, ApiError>
where
    C: ThinqCloud + 'static,
    S: SessionStore + 'static,
    J: JeedomApi + 'static,
    L: LogControl + 'static,
{
    state.authorize(&headers).await?;
    let updated = configured(&state)?.update_all().await?;
    Ok(Json(UpdateResponse { updated }))
}

/// `POST /jeedom/update/{logical_id}`
pub async fn update_one<C, S, J, L>(
    State(state): State<AppState<C, S, J, L>>,
    headers: HeaderMap,
    Path(logical_id): Path<String>,
) -> Result<Json<UpdateResponse>, ApiError>
where
    C: ThinqCloud + 'static,
    S: SessionStore + 'static,
    J: JeedomApi + 'static,
    L: LogControl + 'static,
{
    state.authorize(&headers).await?;
    let outcome = configured(&state)?.update_one(&logical_id).await;
    Ok(Json(UpdateResponse {
        updated: vec![outcome],
    }))
}
