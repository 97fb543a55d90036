//! Axum router assembly.

use axum::Router;
use tower_http::trace::TraceLayer;

use thinq_bridge_app::ports::{JeedomApi, LogControl, SessionStore, ThinqCloud};

use crate::state::AppState;

/// Build the top-level axum [`Router`].
///
/// Unknown routes answer with a JSON 404. Includes a [`TraceLayer`] that
/// logs each HTTP request/response at the `DEBUG` level using the `tracing`
/// ecosystem.
pub fn build<C, S, J, L>(state: AppState<C, S, J, L>) -> Router
where
    C: ThinqCloud + 'static,
    S: SessionStore + 'static,
    J: JeedomApi + 'static,
    L: LogControl + 'static,
{
    crate::api::routes::<C, S, J, L>()
        .fallback(crate::api::system::not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{body_json, login, send, state, state_with_jeedom};
    use axum::http::{Method, StatusCode};
    use thinq_bridge_adapter_virtual::{VirtualAirConditioner, VirtualWasher};
    use thinq_bridge_domain::log_level::LogLevel;

    #[tokio::test]
    async fn should_answer_ping_before_login() {
        let response = send(build(state()), Method::GET, "/ping", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["state"], "ok");
        assert_eq!(body["jeedom_token"], false);
        assert!(body["starting"].as_f64().unwrap() > 0.0);
    }

    #[tokio::test]
    async fn should_report_token_in_ping_after_login() {
        let state = state();
        login(&state).await;
        let body = body_json(send(build(state), Method::GET, "/ping", None).await).await;
        assert_eq!(body["jeedom_token"], true);
    }

    #[tokio::test]
    async fn should_serve_banner() {
        let state = state().with_debug(true);
        let body = body_json(send(build(state), Method::GET, "/", None).await).await;
        assert_eq!(body["debug"], true);
        assert!(body["msg"].is_string());
    }

    #[tokio::test]
    async fn should_change_log_level() {
        let state = state();
        let log = std::sync::Arc::clone(&state.log);
        let response = send(build(state), Method::POST, "/log/WARNING", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["log"], "warn");
        assert_eq!(body["result"], "ok");
        assert_eq!(*log.level.lock().unwrap(), Some(LogLevel::Warn));
    }

    #[tokio::test]
    async fn should_refuse_unknown_log_level_with_gone() {
        let response = send(build(state()), Method::GET, "/log/loud", None).await;
        assert_eq!(response.status(), StatusCode::GONE);
        let body = body_json(response).await;
        assert_eq!(body["message"], "Unknown Log level loud");
    }

    #[tokio::test]
    async fn should_return_gateway_url() {
        let response = send(build(state()), Method::GET, "/gateway/FR/fr-FR", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert!(body["url"].as_str().unwrap().contains("country=FR"));
    }

    #[tokio::test]
    async fn should_refuse_invalid_gateway_with_gone() {
        let response = send(build(state()), Method::GET, "/gateway/france/fr", None).await;
        assert_eq!(response.status(), StatusCode::GONE);
    }

    #[tokio::test]
    async fn should_use_default_gateway_for_auth() {
        let body = body_json(send(build(state()), Method::GET, "/auth", None).await).await;
        assert!(body["url"].as_str().unwrap().contains("country=US"));
    }

    #[tokio::test]
    async fn should_issue_token_from_callback() {
        let uri = format!("/token/{}", crate::testing::CALLBACK);
        let response = send(build(state()), Method::GET, &uri, None).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["token"], "ok");
        assert_eq!(body["jeedom_token"].as_str().unwrap().len(), 36);
    }

    #[tokio::test]
    async fn should_fail_token_without_credentials() {
        let response = send(
            build(state()),
            Method::POST,
            "/token/https://virtual.lgthinq.local/login/iabClose",
            None,
        )
        .await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert_eq!(body["msg"], "Server Error 500!");
    }

    #[tokio::test]
    async fn should_require_token_header() {
        let state = state();
        login(&state).await;
        let app = build(state);

        let missing = send(app.clone(), Method::GET, "/ls", None).await;
        assert_eq!(missing.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_json(missing).await["message"], "No jeedom token.");

        let wrong = send(app, Method::GET, "/ls", Some("nope")).await;
        assert_eq!(wrong.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_json(wrong).await["message"], "Invalid jeedom token");
    }

    #[tokio::test]
    async fn should_list_devices() {
        let state = state();
        let token = login(&state).await;
        let response = send(build(state), Method::GET, "/ls", Some(&token)).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body[0]["id"], VirtualWasher::ID);
        assert_eq!(body[0]["type"], "WASHER");
        assert_eq!(body[1]["type"], "AC");
    }

    #[tokio::test]
    async fn should_list_devices_after_session_expiry() {
        let state = state();
        let token = login(&state).await;
        state.session.cloud().expire_session();
        let response = send(build(state), Method::GET, "/ls", Some(&token)).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn should_monitor_device() {
        let state = state();
        let token = login(&state).await;
        let uri = format!("/mon/{}", VirtualWasher::ID);
        let response = send(build(state), Method::GET, &uri, Some(&token)).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["State"], "RUNNING");
        assert_eq!(body["Remain_Time_M.max"], 59);
    }

    #[tokio::test]
    async fn should_report_unknown_device_as_not_found() {
        let state = state();
        let token = login(&state).await;
        let response = send(build(state), Method::GET, "/mon/ghost", Some(&token)).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn should_report_disconnected_device_as_not_found() {
        let state = state();
        let token = login(&state).await;
        state.session.cloud().set_online(VirtualWasher::ID, false);
        let uri = format!("/mon/{}", VirtualWasher::ID);
        let response = send(build(state), Method::GET, &uri, Some(&token)).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            body_json(response).await["message"],
            "device Washer not connected"
        );
    }

    #[tokio::test]
    async fn should_dispatch_ac_commands() {
        let state = state();
        let token = login(&state).await;
        let app = build(state);

        let uri = format!("/cmd/turn/{}/on", VirtualAirConditioner::ID);
        let response = send(app.clone(), Method::POST, &uri, Some(&token)).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["result"], "ok");

        let uri = format!("/cmd/ac-config/{}", VirtualAirConditioner::ID);
        let response = send(app, Method::GET, &uri, Some(&token)).await;
        assert_eq!(body_json(response).await["power"], 1150);
    }

    #[tokio::test]
    async fn should_refuse_bad_command_arguments() {
        let state = state();
        let token = login(&state).await;
        let app = build(state);

        let uri = format!("/cmd/set-temp/{}/hot", VirtualAirConditioner::ID);
        let response = send(app.clone(), Method::GET, &uri, Some(&token)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let uri = format!("/cmd/turn/{}/on", VirtualWasher::ID);
        let response = send(app.clone(), Method::GET, &uri, Some(&token)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let uri = format!("/cmd/explode/{}", VirtualAirConditioner::ID);
        let response = send(app, Method::GET, &uri, Some(&token)).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn should_save_state() {
        let state = state();
        let token = login(&state).await;
        let app = build(state);

        let response = send(app.clone(), Method::GET, "/save", Some(&token)).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["file"], "wideq_state.json");
        assert_eq!(body["config"]["jeedom_token"], token.as_str());

        let response = send(app.clone(), Method::GET, "/save/backup.json", Some(&token)).await;
        assert_eq!(body_json(response).await["file"], "backup.json");

        let response = send(app, Method::GET, "/save/.hidden", Some(&token)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn should_answer_not_found_without_jeedom() {
        let state = state();
        let token = login(&state).await;
        let response = send(build(state), Method::POST, "/jeedom/update", Some(&token)).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn should_push_values_to_jeedom() {
        let state = state_with_jeedom();
        let token = login(&state).await;
        let jeedom = state.jeedom.clone().unwrap();
        let response = send(build(state), Method::POST, "/jeedom/update", Some(&token)).await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["updated"][0]["logical_id"], VirtualWasher::ID);
        assert_eq!(body["updated"][0]["pushed"], 1);
        assert_eq!(jeedom.health().await, "Maison");
    }

    #[tokio::test]
    async fn should_report_update_failure_per_device() {
        let state = state_with_jeedom();
        let token = login(&state).await;
        let response = send(
            build(state),
            Method::POST,
            "/jeedom/update/unknown",
            Some(&token),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert!(body["updated"][0]["error"].is_string());
    }

    #[tokio::test]
    async fn should_return_json_404_for_unknown_route() {
        let response = send(build(state()), Method::GET, "/nope/at/all", None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = body_json(response).await;
        assert_eq!(body["msg"], "Error 404 page not found!");
        assert_eq!(body["url"], "/nope/at/all");
    }
}
