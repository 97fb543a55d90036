//! Device listing and monitoring handlers.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::HeaderMap;

use thinq_bridge_app::ports::{JeedomApi, LogControl, SessionStore, ThinqCloud};
use thinq_bridge_domain::device::DeviceInfo;
use thinq_bridge_domain::model::DeviceStatus;

use crate::error::ApiError;
use crate::state::AppState;

/// `GET /ls`
pub async fn list<C, S, J, L>(
    State(state): State<AppState<C, S, J, L>>,
    headers: HeaderMap,
) -> Result<Json<Vec<DeviceInfo>>, ApiError>
where
    C: ThinqCloud + 'static,
    S: SessionStore + 'static,
    J: JeedomApi + 'static,
    L: LogControl + 'static,
{
    state.authorize(&headers).await?;
    let devices = state.devices.list().await?;
    Ok(Json(devices))
}

/// `GET /mon/{id}`
pub async fn monitor<C, S, J, L>(
    State(state): State<AppState<C, S, J, L>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<DeviceStatus>, ApiError>
where
    C: ThinqCloud + 'static,
    S: SessionStore + 'static,
    J: JeedomApi + 'static,
    L: LogControl + 'static,
{
    state.authorize(&headers).await?;
    let status = state.monitor.monitor(&id, state.poll).await?;
    Ok(Json(status))
}
