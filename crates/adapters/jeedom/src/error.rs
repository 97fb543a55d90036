//! Jeedom adapter error types.

use thinq_bridge_domain::error::{BridgeError, JeedomError};

/// Errors specific to the Jeedom JSON-RPC client.
#[derive(Debug, thiserror::Error)]
pub enum JeedomClientError {
    /// The HTTP client could not be built.
    #[error("failed to build HTTP client")]
    Build(#[source] reqwest::Error),

    /// The request did not reach Jeedom or the response could not be read.
    #[error("request to jeedom failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Jeedom answered with a non-success HTTP status.
    #[error("jeedom answered HTTP {0}")]
    Status(u16),

    /// Jeedom answered with a JSON-RPC error object.
    #[error("jeedom error {code}: {message}")]
    Rpc { code: i64, message: String },

    /// The `result` member could not be decoded into the expected type.
    #[error("unexpected jeedom result: {0}")]
    Decode(#[from] serde_json::Error),
}

impl JeedomClientError {
    /// Convert into a [`BridgeError::Jeedom`] for propagation across port
    /// boundaries.
    pub fn into_domain(self) -> BridgeError {
        match self {
            Self::Rpc { code, message } => JeedomError::Rpc { code, message }.into(),
            other => JeedomError::Transport(other.to_string()).into(),
        }
    }
}

impl From<JeedomClientError> for BridgeError {
    fn from(err: JeedomClientError) -> Self {
        err.into_domain()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_keep_rpc_code() {
        let err: BridgeError = JeedomClientError::Rpc {
            code: -32001,
            message: "Vous n'êtes pas autorisé".to_string(),
        }
        .into();
        assert!(matches!(
            err,
            BridgeError::Jeedom(JeedomError::Rpc { code: -32001, .. })
        ));
    }

    #[test]
    fn should_convert_status_to_transport_error() {
        let err: BridgeError = JeedomClientError::Status(502).into();
        assert_eq!(err.message(), "jeedom transport error: jeedom answered HTTP 502");
    }
}
