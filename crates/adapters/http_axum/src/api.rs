//! JSON REST API handler modules.

#[allow(clippy::missing_errors_doc)]
pub mod commands;
#[allow(clippy::missing_errors_doc)]
pub mod devices;
#[allow(clippy::missing_errors_doc)]
pub mod jeedom;
#[allow(clippy::missing_errors_doc)]
pub mod session;
#[allow(clippy::missing_errors_doc)]
pub mod system;

use axum::Router;
use axum::routing::{get, post};

use thinq_bridge_app::ports::{JeedomApi, LogControl, SessionStore, ThinqCloud};

use crate::state::AppState;

/// Build the API router.
pub fn routes<C, S, J, L>() -> Router<AppState<C, S, J, L>>
where
    C: ThinqCloud + 'static,
    S: SessionStore + 'static,
    J: JeedomApi + 'static,
    L: LogControl + 'static,
{
    Router::new()
        // System
        .route("/", get(system::banner::<C, S, J, L>))
        .route("/ping", get(system::ping::<C, S, J, L>))
        .route(
            "/log/{level}",
            get(system::set_log_level::<C, S, J, L>).post(system::set_log_level::<C, S, J, L>),
        )
        // Session
        .route(
            "/gateway/{country}/{language}",
            get(session::gateway::<C, S, J, L>),
        )
        .route("/auth", get(session::gateway_default::<C, S, J, L>))
        .route(
            "/token/{*callback}",
            get(session::token::<C, S, J, L>).post(session::token::<C, S, J, L>),
        )
        .route("/save", get(session::save::<C, S, J, L>))
        .route("/save/{file}", get(session::save_as::<C, S, J, L>))
        // Devices
        .route("/ls", get(devices::list::<C, S, J, L>))
        .route("/mon/{id}", get(devices::monitor::<C, S, J, L>))
        // Commands
        .route(
            "/cmd/{cmd}/{id}",
            get(commands::run::<C, S, J, L>).post(commands::run::<C, S, J, L>),
        )
        .route(
            "/cmd/{cmd}/{id}/{arg}",
            get(commands::run_with_arg::<C, S, J, L>)
                .post(commands::run_with_arg::<C, S, J, L>),
        )
        // Jeedom
        .route("/jeedom/update", post(jeedom::update_all::<C, S, J, L>))
        .route(
            "/jeedom/update/{logical_id}",
            post(jeedom::update_one::<C, S, J, L>),
        )
}
