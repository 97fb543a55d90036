//! Session service: gateway selection, login, token checks and persistence.
//!
//! Holds the only mutable copy of the [`SessionState`]. Other services borrow
//! the cloud client through it and run their calls with
//! [`SessionService::with_session`], which refreshes an expired session once.

use std::future::Future;

use tokio::sync::RwLock;

use thinq_bridge_domain::error::{BridgeError, CloudError, UnauthorizedError, ValidationError};
use thinq_bridge_domain::locale::Locale;
use thinq_bridge_domain::session::{STATE_FILE, SessionState};
use thinq_bridge_domain::time::{Timestamp, now};

use crate::ports::{CloudSession, SessionStore, ThinqCloud};

/// A state written by [`SessionService::save`].
#[derive(Debug, Clone)]
pub struct SavedState {
    pub config: SessionState,
    pub file: String,
}

/// Application service owning the cloud client and the session state.
pub struct SessionService<C, S> {
    cloud: C,
    store: S,
    state: RwLock<SessionState>,
    starting: Timestamp,
}

impl<C: ThinqCloud, S: SessionStore> SessionService<C, S> {
    /// Create a service with an empty state.
    pub fn new(cloud: C, store: S) -> Self {
        Self {
            cloud,
            store,
            state: RwLock::new(SessionState::default()),
            starting: now(),
        }
    }

    /// The cloud client, for services that need direct access.
    pub fn cloud(&self) -> &C {
        &self.cloud
    }

    /// When this service was created.
    pub fn starting(&self) -> Timestamp {
        self.starting
    }

    /// Snapshot of the current state.
    pub async fn state(&self) -> SessionState {
        self.state.read().await.clone()
    }

    /// Whether a `jeedom_token` was issued.
    pub async fn has_token(&self) -> bool {
        self.state.read().await.has_token()
    }

    /// Whether a login already happened.
    pub async fn is_authenticated(&self) -> bool {
        self.state.read().await.is_authenticated()
    }

    /// Replace the whole state (used when seeding from another source).
    pub async fn replace(&self, state: SessionState) {
        *self.state.write().await = state;
    }

    /// Load the default state file, if any.
    ///
    /// Returns `true` when a saved state was found.
    ///
    /// # Errors
    ///
    /// Returns a storage error when the file exists but cannot be read.
    #[tracing::instrument(skip(self))]
    pub async fn restore(&self) -> Result<bool, BridgeError> {
        match self.store.load(STATE_FILE).await? {
            Some(saved) => {
                tracing::info!(file = STATE_FILE, "state file found");
                self.replace(saved).await;
                Ok(true)
            }
            None => {
                tracing::debug!(file = STATE_FILE, "no state file found");
                Ok(false)
            }
        }
    }

    /// Select the regional gateway and return its login URL.
    ///
    /// Previous credentials are dropped; the `jeedom_token` is kept.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::Validation`] for a malformed country or
    /// language, or the cloud error.
    #[tracing::instrument(skip(self))]
    pub async fn gateway(&self, country: &str, language: &str) -> Result<String, BridgeError> {
        let locale = Locale::new(country, language).inspect_err(|err| {
            tracing::error!(error = %err, "invalid locale");
        })?;
        tracing::info!(country = %locale.country, language = %locale.language, "auth");

        let url = self.cloud.oauth_url(&locale).await?;

        let mut state = self.state.write().await;
        state.locale = locale;
        state.credentials = None;
        state.session_id = None;
        Ok(url)
    }

    /// Gateway of the default locale (`US`, `en-US`).
    ///
    /// # Errors
    ///
    /// See [`gateway`](Self::gateway).
    pub async fn gateway_default(&self) -> Result<String, BridgeError> {
        let locale = Locale::default();
        self.gateway(&locale.country, &locale.language).await
    }

    /// Finish the login with the URL LG redirected to and issue a new
    /// `jeedom_token`.
    ///
    /// # Errors
    ///
    /// Returns the cloud error when the callback URL is rejected.
    #[tracing::instrument(skip(self, callback_url))]
    pub async fn authenticate(&self, callback_url: &str) -> Result<String, BridgeError> {
        let locale = self.state.read().await.locale.clone();
        let credentials = self.cloud.login(&locale, callback_url).await?;
        let session = self.cloud.refresh(&locale, &credentials).await?;

        let token = uuid::Uuid::new_v4().to_string();
        let mut state = self.state.write().await;
        state.credentials = Some(session.credentials);
        state.session_id = Some(session.session_id);
        state.jeedom_token = Some(token.clone());
        tracing::info!("logged in, new jeedom token issued");
        Ok(token)
    }

    /// Check the `jeedom_token` presented by a caller.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::Unauthorized`] when the token is missing or does
    /// not match the issued one.
    pub async fn check_token(&self, presented: Option<&str>) -> Result<(), BridgeError> {
        let Some(presented) = presented else {
            tracing::debug!("request without token");
            return Err(UnauthorizedError::MissingToken.into());
        };
        let state = self.state.read().await;
        match state.jeedom_token.as_deref() {
            Some(expected) if !expected.is_empty() && expected == presented => Ok(()),
            _ => Err(UnauthorizedError::InvalidToken.into()),
        }
    }

    /// Persist the state under `file` (default `wideq_state.json`).
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::Validation`] when `file` is not a bare file
    /// name, or the storage error.
    #[tracing::instrument(skip(self))]
    pub async fn save(&self, file: Option<&str>) -> Result<SavedState, BridgeError> {
        let file = file.unwrap_or(STATE_FILE);
        if !is_bare_file_name(file) {
            return Err(ValidationError::InvalidFileName(file.to_string()).into());
        }
        let config = self.state().await;
        let path = self.store.save(file, &config).await?;
        tracing::debug!(path = %path, "wrote state file");
        Ok(SavedState {
            config,
            file: file.to_string(),
        })
    }

    /// Current cloud session, opening one from the stored credentials when
    /// needed.
    ///
    /// # Errors
    ///
    /// Returns [`CloudError::NotAuthenticated`] before the first login, or
    /// the refresh error.
    pub async fn session(&self) -> Result<CloudSession, BridgeError> {
        {
            let state = self.state.read().await;
            let credentials = state
                .credentials
                .as_ref()
                .ok_or(CloudError::NotAuthenticated)?;
            if let Some(session_id) = &state.session_id {
                return Ok(CloudSession {
                    locale: state.locale.clone(),
                    credentials: credentials.clone(),
                    session_id: session_id.clone(),
                });
            }
        }
        self.refresh().await
    }

    /// Refresh the credentials and open a new session.
    ///
    /// # Errors
    ///
    /// Returns [`CloudError::NotAuthenticated`] before the first login, or
    /// the cloud error.
    #[tracing::instrument(skip(self))]
    pub async fn refresh(&self) -> Result<CloudSession, BridgeError> {
        let (locale, credentials) = {
            let state = self.state.read().await;
            let credentials = state
                .credentials
                .clone()
                .ok_or(CloudError::NotAuthenticated)?;
            (state.locale.clone(), credentials)
        };
        let session = self.cloud.refresh(&locale, &credentials).await?;

        let mut state = self.state.write().await;
        state.credentials = Some(session.credentials.clone());
        state.session_id = Some(session.session_id.clone());
        tracing::debug!("session refreshed");
        Ok(session)
    }

    /// Run `op` with the current session; when it reports an expired
    /// session, refresh and run it exactly once more.
    ///
    /// # Errors
    ///
    /// Returns the error of `op` (second attempt when retried) or of the
    /// refresh.
    pub async fn with_session<T, F, Fut>(&self, op: F) -> Result<T, BridgeError>
    where
        F: Fn(CloudSession) -> Fut,
        Fut: Future<Output = Result<T, BridgeError>>,
    {
        let session = self.session().await?;
        match op(session).await {
            Err(err) if err.is_session_expired() => {
                tracing::info!("Session expired.");
                let session = self.refresh().await?;
                op(session).await
            }
            other => other,
        }
    }
}

fn is_bare_file_name(file: &str) -> bool {
    !file.is_empty()
        && file != "."
        && file != ".."
        && !file.contains(['/', '\\'])
        && !file.starts_with('.')
}
