//! Jeedom synchronisation: monitor LG devices and push values into the
//! matching Jeedom commands.
//!
//! The eqLogics of the `lgthinq` plugin are fetched once and cached together
//! with the last pushed value of every command, so an unchanged reading is
//! not sent twice.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;
use tokio::sync::Mutex;

use thinq_bridge_domain::error::{BridgeError, JeedomError, NotFoundError};
use thinq_bridge_domain::jeedom::{EqLogic, PLUGIN};
use thinq_bridge_domain::locale::Locale;
use thinq_bridge_domain::model::DeviceStatus;
use thinq_bridge_domain::session::SessionState;

use crate::ports::{JeedomApi, SessionStore, ThinqCloud};
use crate::services::monitor_service::{MonitorService, PollSettings};
use crate::services::session_service::SessionService;

/// Bridge configuration stored in the Jeedom plugin settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JeedomClientConfig {
    pub locale: Locale,
    pub auth_url: Option<String>,
}

/// Result of updating one eqLogic.
#[derive(Debug, Clone, Serialize)]
pub struct UpdateOutcome {
    pub logical_id: String,
    /// Number of commands that received a new value.
    pub pushed: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Application service synchronising monitored values into Jeedom.
pub struct JeedomSync<C, S, J> {
    jeedom: J,
    monitor: MonitorService<C, S>,
    settings: PollSettings,
    eq_logics: Mutex<Option<BTreeMap<String, EqLogic>>>,
}

impl<C: ThinqCloud, S: SessionStore, J: JeedomApi> JeedomSync<C, S, J> {
    pub fn new(jeedom: J, monitor: MonitorService<C, S>) -> Self {
        Self {
            jeedom,
            monitor,
            settings: PollSettings::JEEDOM,
            eq_logics: Mutex::new(None),
        }
    }

    #[must_use]
    pub fn with_settings(mut self, settings: PollSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Jeedom name, or the error text when Jeedom cannot be reached.
    pub async fn health(&self) -> String {
        match self.jeedom.config_by_key("name", PLUGIN).await {
            Ok(Value::String(name)) => name,
            Ok(other) => other.to_string(),
            Err(err) => err.message(),
        }
    }

    /// Read `LgCountry`, `LgLanguage` and `LgAuthUrl` from the plugin
    /// configuration.
    ///
    /// # Errors
    ///
    /// Returns the Jeedom error, or a validation error when the stored
    /// locale is malformed.
    #[tracing::instrument(skip(self))]
    pub async fn client_config(&self) -> Result<JeedomClientConfig, BridgeError> {
        let country = self.config_string("LgCountry").await?;
        let language = self.config_string("LgLanguage").await?;
        let auth_url = self
            .config_string("LgAuthUrl")
            .await?
            .filter(|url| !url.is_empty());

        let locale = Locale::new(
            country.as_deref().unwrap_or_default(),
            language.as_deref().unwrap_or_default(),
        )?;
        tracing::debug!(
            country = %locale.country,
            language = %locale.language,
            has_auth_url = auth_url.is_some(),
            "jeedom lgthinq configuration"
        );
        Ok(JeedomClientConfig { locale, auth_url })
    }

    /// Seed an unauthenticated session from the plugin configuration.
    ///
    /// Returns `true` when a login happened.
    ///
    /// # Errors
    ///
    /// Returns the Jeedom or cloud error.
    pub async fn seed_session(&self, session: &SessionService<C, S>) -> Result<bool, BridgeError> {
        if session.is_authenticated().await {
            return Ok(false);
        }
        let config = self.client_config().await?;
        let mut state = session.state().await;
        state.locale = config.locale;
        session
            .replace(SessionState {
                credentials: None,
                session_id: None,
                ..state
            })
            .await;

        match config.auth_url {
            Some(url) => {
                session.authenticate(&url).await?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn config_string(&self, key: &str) -> Result<Option<String>, BridgeError> {
        Ok(match self.jeedom.config_by_key(key, PLUGIN).await? {
            Value::String(s) => Some(s),
            Value::Null => None,
            other => Some(other.to_string()),
        })
    }

    /// Logical ids of the cached eqLogics, loading them on first use.
    ///
    /// # Errors
    ///
    /// Returns the Jeedom error when the eqLogics cannot be loaded.
    pub async fn logical_ids(&self) -> Result<Vec<String>, BridgeError> {
        let mut cache = self.eq_logics.lock().await;
        Ok(self.loaded(&mut cache).await?.keys().cloned().collect())
    }

    async fn loaded<'a>(
        &self,
        cache: &'a mut Option<BTreeMap<String, EqLogic>>,
    ) -> Result<&'a mut BTreeMap<String, EqLogic>, BridgeError> {
        if cache.is_none() {
            let records = self.jeedom.eq_logics_by_type(PLUGIN).await?;
            tracing::debug!(count = records.len(), "init eqLogics");
            let mut eq_logics = BTreeMap::new();
            for record in records {
                let commands = self.jeedom.commands_by_eq_logic(&record.id).await?;
                let eq = EqLogic::new(record, commands);
                eq_logics.insert(eq.logical_id().to_string(), eq);
            }
            *cache = Some(eq_logics);
        }
        Ok(cache.get_or_insert_with(BTreeMap::new))
    }

    /// Forget the cached eqLogics (and pushed values).
    pub async fn reload(&self) {
        *self.eq_logics.lock().await = None;
    }

    /// Monitor the LG device behind the eqLogic `logical_id`.
    ///
    /// # Errors
    ///
    /// - [`BridgeError::NotFound`] for an unknown logical id
    /// - [`JeedomError::Disabled`] when the eqLogic is not enabled
    /// - any monitoring error
    #[tracing::instrument(skip(self))]
    pub async fn mon(&self, logical_id: &str) -> Result<DeviceStatus, BridgeError> {
        {
            let mut cache = self.eq_logics.lock().await;
            let eq = self
                .loaded(&mut cache)
                .await?
                .get(logical_id)
                .ok_or_else(|| NotFoundError {
                    entity: "LG device for logicalId",
                    id: logical_id.to_string(),
                })?;
            if !eq.is_enabled() {
                return Err(JeedomError::Disabled(logical_id.to_string()).into());
            }
            tracing::info!(
                id = %eq.record.id,
                name = %eq.name(),
                visible = eq.record.is_visible,
                commands = eq.command_count(),
                "monitoring eqLogic"
            );
        }
        self.monitor.monitor(logical_id, self.settings).await
    }

    /// Monitor one eqLogic and push every changed value to Jeedom.
    ///
    /// Returns how many commands received a new value.
    ///
    /// # Errors
    ///
    /// See [`mon`](Self::mon); push failures are logged and the value is
    /// retried on the next update.
    #[tracing::instrument(skip(self))]
    pub async fn update(&self, logical_id: &str) -> Result<usize, BridgeError> {
        let status = self.mon(logical_id).await?;

        let mut cache = self.eq_logics.lock().await;
        let Some(eq) = self.loaded(&mut cache).await?.get_mut(logical_id) else {
            return Ok(0);
        };

        let mut pushed = 0;
        for (key, value) in &status {
            if eq.command(key).is_none() {
                tracing::debug!(command = %key, eq_logic = %eq.name(), "no command in eqLogic");
                continue;
            }
            let Some(command_id) = eq.record_value(key, value) else {
                continue;
            };
            match self.jeedom.command_event(&command_id, value).await {
                Ok(()) => {
                    tracing::debug!(eq_logic = %eq.name(), command = %key, %value, "value pushed");
                    pushed += 1;
                }
                Err(err) => {
                    tracing::error!(command = %key, error = %err.message(), "cmd::event failed");
                    eq.forget_value(&command_id);
                }
            }
        }
        Ok(pushed)
    }

    /// Update every eqLogic, logging failures instead of stopping.
    ///
    /// # Errors
    ///
    /// Returns the Jeedom error only when the eqLogics cannot be loaded.
    pub async fn update_all(&self) -> Result<Vec<UpdateOutcome>, BridgeError> {
        let mut outcomes = Vec::new();
        for logical_id in self.logical_ids().await? {
            outcomes.push(self.update_one(&logical_id).await);
        }
        Ok(outcomes)
    }

    /// Like [`update`](Self::update) but folds the error into the outcome.
    pub async fn update_one(&self, logical_id: &str) -> UpdateOutcome {
        match self.update(logical_id).await {
            Ok(pushed) => UpdateOutcome {
                logical_id: logical_id.to_string(),
                pushed,
                error: None,
            },
            Err(err) => {
                tracing::error!(logical_id, error = %err.message(), "update failed");
                UpdateOutcome {
                    logical_id: logical_id.to_string(),
                    pushed: 0,
                    error: Some(err.message()),
                }
            }
        }
    }
}
