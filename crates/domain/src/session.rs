//! Serializable session state: the content of `wideq_state.json`.

use serde::{Deserialize, Serialize};

use crate::locale::Locale;

/// Name of the persisted state file.
pub const STATE_FILE: &str = "wideq_state.json";

/// Header (and state field) carrying the secret shared with the Jeedom plugin.
pub const TOKEN_KEY: &str = "jeedom_token";

/// OAuth-derived credentials handed back by the cloud after login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub access_token: String,
    pub refresh_token: String,
    /// OAuth root URL the tokens were issued by.
    #[serde(default)]
    pub oauth_root: String,
}

/// Everything the bridge needs to talk to the LG cloud again after a restart.
///
/// Every field defaults so that an empty `{}` document loads.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionState {
    pub locale: Locale,
    pub credentials: Option<Credentials>,
    /// Cloud session id obtained from the credentials.
    pub session_id: Option<String>,
    /// Token expected in the `jeedom_token` header of protected routes.
    pub jeedom_token: Option<String>,
}

impl SessionState {
    /// Whether a login already happened.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.credentials.is_some()
    }

    /// Whether a `jeedom_token` was issued.
    #[must_use]
    pub fn has_token(&self) -> bool {
        self.jeedom_token.as_deref().is_some_and(|t| !t.is_empty())
    }
}
