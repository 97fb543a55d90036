//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into [`BridgeError`]
//! via `#[from]`. The HTTP adapter maps every variant to a status code.

/// Top-level error for the bridge.
#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    #[error("validation error")]
    Validation(#[from] ValidationError),

    #[error("unauthorized")]
    Unauthorized(#[from] UnauthorizedError),

    #[error("not found")]
    NotFound(#[from] NotFoundError),

    #[error("LG cloud error")]
    Cloud(#[from] CloudError),

    #[error("jeedom error")]
    Jeedom(#[from] JeedomError),

    #[error("storage error")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl BridgeError {
    /// Whether the cloud rejected the call because the session expired.
    #[must_use]
    pub fn is_session_expired(&self) -> bool {
        matches!(self, Self::Cloud(CloudError::NotLoggedIn))
    }

    /// Human readable message, walking down to the most specific error.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::Validation(err) => err.to_string(),
            Self::Unauthorized(err) => err.to_string(),
            Self::NotFound(err) => err.to_string(),
            Self::Cloud(err) => err.to_string(),
            Self::Jeedom(err) => err.to_string(),
            Self::Storage(err) => err.to_string(),
        }
    }
}

/// Input rejected before reaching any external system.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error(
        "Country must be two or three letters all upper case (e.g. US, NO, KR) got: '{0}'"
    )]
    InvalidCountry(String),

    #[error(
        "Language must be a combination of language and country (e.g. en-US, no-NO, kr-KR) got: '{0}'"
    )]
    InvalidLanguage(String),

    #[error("Unknown Log level {0}")]
    UnknownLogLevel(String),

    #[error("invalid argument '{value}' for command {command}")]
    InvalidArgument {
        command: &'static str,
        value: String,
    },

    #[error("missing argument for command {0}")]
    MissingArgument(&'static str),

    #[error("device \"{0}\" is not an AC device")]
    NotAnAcDevice(String),

    #[error("invalid file name '{0}'")]
    InvalidFileName(String),
}

/// The caller did not present the expected `jeedom_token`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UnauthorizedError {
    #[error("No jeedom token.")]
    MissingToken,

    #[error("Invalid jeedom token")]
    InvalidToken,
}

/// A looked-up resource does not exist.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{entity} \"{id}\" not found")]
pub struct NotFoundError {
    pub entity: &'static str,
    pub id: String,
}

/// Failures reported by the LG cloud port.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CloudError {
    /// The session expired; a refresh is expected to fix it.
    #[error("Session expired.")]
    NotLoggedIn,

    /// No OAuth credentials were ever registered.
    #[error("not authenticated, call /gateway then /token first")]
    NotAuthenticated,

    #[error("device {0} not connected")]
    NotConnected(String),

    /// Polling exhausted every attempt without usable data.
    #[error("Error, no response from LG cloud")]
    NoResponse,

    #[error("LG cloud API error {code}: {message}")]
    Api { code: String, message: String },
}

/// Failures reported by the Jeedom port.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum JeedomError {
    #[error("jeedom is not configured")]
    NotConfigured,

    #[error("jeedom error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("device not active in jeedom configuration (logicalId {0})")]
    Disabled(String),

    #[error("jeedom transport error: {0}")]
    Transport(String),
}
