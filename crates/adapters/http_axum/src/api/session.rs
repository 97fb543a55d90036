//! Gateway, login and state persistence handlers.

use axum::Json;
use axum::extract::{Path, RawQuery, State};
use axum::http::HeaderMap;
use serde::Serialize;

use thinq_bridge_app::ports::{JeedomApi, LogControl, SessionStore, ThinqCloud};
use thinq_bridge_app::services::session_service::SavedState;
use thinq_bridge_domain::session::SessionState;

use crate::error::ApiError;
use crate::state::AppState;

/// Body of the gateway endpoints.
#[derive(Debug, Serialize)]
pub struct GatewayResponse {
    pub url: String,
}

/// Body of `/token/{*callback}`.
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: &'static str,
    pub jeedom_token: String,
}

/// Body of the save endpoints.
#[derive(Debug, Serialize)]
pub struct SaveResponse {
    pub config: SessionState,
    pub file: String,
}

impl From<SavedState> for SaveResponse {
    fn from(saved: SavedState) -> Self {
        Self {
            config: saved.config,
            file: saved.file,
        }
    }
}

/// `GET /gateway/{country}/{language}`
pub async fn gateway<C, S, J, L>(
    State(state): State<AppState<C, S, J, L>>,
    Path((country, language)): Path<(String, String)>,
) -> Result<Json<GatewayResponse>, ApiError>
where
    C: ThinqCloud + 'static,
    S: SessionStore + 'static,
    J: JeedomApi + 'static,
    L: LogControl + 'static,
{
    let url = state.session.gateway(&country, &language).await?;
    Ok(Json(GatewayResponse { url }))
}

/// `GET /auth`
pub async fn gateway_default<C, S, J, L>(
    State(state): State<AppState<C, S, J, L>>,
) -> Result<Json<GatewayResponse>, ApiError>
where
    C: ThinqCloud + 'static,
    S: SessionStore + 'static,
    J: JeedomApi + 'static,
    L: LogControl + 'static,
{
    let url = state.session.gateway_default().await?;
    Ok(Json(GatewayResponse { url }))
}

/// `GET|POST /token/{*callback}`
///
/// The callback is the URL the LG login page redirected to, passed verbatim
/// after `/token/` together with its query string.
pub async fn token<C, S, J, L>(
    State(state): State<AppState<C, S, J, L>>,
    Path(callback): Path<String>,
    RawQuery(query): RawQuery,
) -> Result<Json<TokenResponse>, ApiError>
where
    C: ThinqCloud + 'static,
    S: SessionStore + 'static,
    J: JeedomApi + 'static,
    L: LogControl + 'static,
{
    let callback = match query {
        Some(query) => format!("{callback}?{query}"),
        None => callback,
    };
    let jeedom_token = state.session.authenticate(&callback).await?;
    Ok(Json(TokenResponse {
        token: "ok",
        jeedom_token,
    }))
}

/// `GET /save`
pub async fn save<C, S, J, L>(
    State(state): State<AppState<C, S, J, L>>,
    headers: HeaderMap,
) -> Result<Json<SaveResponse>, ApiError>
where
    C: ThinqCloud + 'static,
    S: SessionStore + 'static,
    J: JeedomApi + 'static,
    L: LogControl + 'static,
{
    state.authorize(&headers).await?;
    let saved = state.session.save(None).await?;
    Ok(Json(saved.into()))
}

/// `GET /save/{file}`
pub async fn save_as<C, S, J, L>(
    State(state): State<AppState<C, S, J, L>>,
    headers: HeaderMap,
    Path(file): Path<String>,
) -> Result<Json<SaveResponse>, ApiError>
where
    C: ThinqCloud + 'static,
    S: SessionStore + 'static,
    J: JeedomApi + 'static,
    L: LogControl + 'static,
{
    state.authorize(&headers).await?;
    let saved = state.session.save(Some(&file)).await?;
    Ok(Json(saved.into()))
}
