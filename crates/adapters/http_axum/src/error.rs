//! HTTP error response mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use thinq_bridge_domain::error::{BridgeError, CloudError, JeedomError, ValidationError};

/// Maps [`BridgeError`] to an HTTP response with appropriate status code.
#[derive(Debug)]
pub struct ApiError(BridgeError);

impl From<BridgeError> for ApiError {
    fn from(err: BridgeError) -> Self {
        Self(err)
    }
}

impl ApiError {
    /// Status code for the wrapped error.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            BridgeError::Validation(
                ValidationError::InvalidCountry(_)
                | ValidationError::InvalidLanguage(_)
                | ValidationError::UnknownLogLevel(_),
            ) => StatusCode::GONE,
            BridgeError::Validation(_) => StatusCode::BAD_REQUEST,
            BridgeError::Unauthorized(_)
            | BridgeError::Cloud(
                CloudError::NotLoggedIn | CloudError::NotAuthenticated | CloudError::NoResponse,
            ) => StatusCode::UNAUTHORIZED,
            BridgeError::NotFound(_)
            | BridgeError::Cloud(CloudError::NotConnected(_))
            | BridgeError::Jeedom(JeedomError::Disabled(_) | JeedomError::NotConfigured) => {
                StatusCode::NOT_FOUND
            }
            BridgeError::Cloud(CloudError::Api { .. })
            | BridgeError::Jeedom(_)
            | BridgeError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.0.message();

        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %message, "server error");
            return (
                status,
                Json(json!({"msg": "Server Error 500!", "err": message})),
            )
                .into_response();
        }
        tracing::debug!(status = status.as_u16(), error = %message, "request failed");
        (status, Json(json!({"message": message}))).into_response()
    }
}
