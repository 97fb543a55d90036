//! Configuration loading: TOML file with environment variable and command
//! line overrides.
//!
//! Looks for `thinq-bridge.toml` in the working directory unless `--config`
//! names another file. Every field has a sensible default so the file is
//! optional. Environment variables take precedence over file values and
//! command line flags over both.

use std::path::PathBuf;

use serde::Deserialize;

use crate::cli::Cli;

pub const DEFAULT_FILE: &str = "thinq-bridge.toml";

/// Jeedom address used when only an API key is configured.
pub const DEFAULT_JEEDOM_ADDRESS: &str = "http://localhost";

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP server settings.
    pub server: ServerConfig,
    /// Where state files are written.
    pub state: StateConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
    /// Jeedom connection.
    pub jeedom: JeedomConfig,
    /// Simulated cloud settings.
    pub cloud: CloudConfig,
}

/// HTTP listener configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind to (e.g. `0.0.0.0`).
    pub host: String,
    /// TCP port.
    pub port: u16,
}

/// State file configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct StateConfig {
    /// Directory holding `wideq_state.json` and saved copies.
    pub dir: PathBuf,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
    /// Reported by `/` and forces debug logging.
    pub verbose: bool,
}

/// Jeedom JSON-RPC configuration, enabled by the API key.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct JeedomConfig {
    /// Jeedom address (`host`, `host:port` or base URL), `http://localhost`
    /// when only the key is set.
    pub ip: Option<String>,
    /// Jeedom API key.
    pub key: Option<String>,
}

/// Virtual cloud configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct CloudConfig {
    /// Empty polls before a monitor delivers data.
    pub warmup_polls: u32,
}

impl Config {
    /// Load configuration from the file (if present), then apply
    /// environment-variable and command line overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed, or if the
    /// result does not validate.
    pub fn load(cli: &Cli) -> Result<Self, ConfigError> {
        let mut config = Self::from_file(cli.config.as_deref().unwrap_or(DEFAULT_FILE))?;
        config.apply_env_overrides();
        config.apply_cli(cli);
        config.apply_jeedom_default();
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("THINQ_BRIDGE_HOST") {
            self.server.host = val;
        }
        if let Ok(val) = std::env::var("THINQ_BRIDGE_PORT") {
            if let Ok(port) = val.parse() {
                self.server.port = port;
            }
        }
        if let Ok(val) = std::env::var("THINQ_BRIDGE_BIND") {
            if let Some((host, port)) = val.rsplit_once(':') {
                self.server.host = host.to_string();
                if let Ok(port) = port.parse() {
                    self.server.port = port;
                }
            }
        }
        if let Ok(val) = std::env::var("THINQ_BRIDGE_STATE_DIR") {
            self.state.dir = PathBuf::from(val);
        }
        if let Ok(val) = std::env::var("THINQ_BRIDGE_JEEDOM_IP") {
            self.jeedom.ip = Some(val);
        }
        if let Ok(val) = std::env::var("THINQ_BRIDGE_JEEDOM_KEY") {
            self.jeedom.key = Some(val);
        }
        if let Ok(val) = std::env::var("THINQ_BRIDGE_LOG") {
            self.logging.filter = val;
        }
        if let Ok(val) = std::env::var("RUST_LOG") {
            self.logging.filter = val;
        }
    }

    fn apply_cli(&mut self, cli: &Cli) {
        if let Some(port) = cli.port {
            self.server.port = port;
        }
        if let Some(ip) = &cli.ip {
            self.jeedom.ip = Some(ip.clone());
        }
        if let Some(key) = &cli.key {
            self.jeedom.key = Some(key.clone());
        }
        if cli.verbose {
            self.logging.verbose = true;
        }
    }

    fn apply_jeedom_default(&mut self) {
        if self.jeedom.key.is_some() && self.jeedom.ip.is_none() {
            self.jeedom.ip = Some(DEFAULT_JEEDOM_ADDRESS.to_string());
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Validation("port must be non-zero".to_string()));
        }
        if self.jeedom.ip.is_some() && self.jeedom.key.is_none() {
            return Err(ConfigError::Validation(
                "jeedom address given without an API key".to_string(),
            ));
        }
        Ok(())
    }

    /// Return the `host:port` bind address.
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Jeedom address and API key, when Jeedom is configured.
    #[must_use]
    pub fn jeedom(&self) -> Option<(&str, &str)> {
        Some((self.jeedom.ip.as_deref()?, self.jeedom.key.as_deref()?))
    }

    /// Effective log filter: `debug` everywhere when verbose.
    #[must_use]
    pub fn log_filter(&self) -> &str {
        if self.logging.verbose {
            "debug"
        } else {
            &self.logging.filter
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5025,
        }
    }
}

impl Default for StateConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("."),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "thinqd=info,thinq_bridge=info,tower_http=info".to_string(),
            verbose: false,
        }
    }
}

impl Default for CloudConfig {
    fn default() -> Self {
        Self { warmup_polls: 1 }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}
