//! # thinq-bridge-adapter-state-file
//!
//! [`SessionStore`] over a directory of flat JSON files. The default file is
//! `wideq_state.json`; `/save/{file}` writes siblings in the same directory.
//!
//! Files are written to a temporary sibling first and renamed into place so
//! a crash never leaves a truncated state behind.
//!
//! ## Dependency rule
//!
//! Depends on `thinq-bridge-app` (port traits) and `thinq-bridge-domain` only.

pub mod error;

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use thinq_bridge_app::ports::SessionStore;
use thinq_bridge_domain::error::BridgeError;
use thinq_bridge_domain::session::SessionState;

use crate::error::StateFileError;

/// JSON state files stored in one directory.
#[derive(Debug, Clone)]
pub struct StateFileStore {
    dir: PathBuf,
}

impl StateFileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }

    async fn read(&self, name: &str) -> Result<Option<SessionState>, StateFileError> {
        let path = self.path(name);
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(StateFileError::Io { path, source }),
        };
        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|source| StateFileError::Json { path, source })
    }

    async fn write(&self, name: &str, state: &SessionState) -> Result<PathBuf, StateFileError> {
        let path = self.path(name);
        let bytes = serde_json::to_vec_pretty(state).map_err(|source| StateFileError::Json {
            path: path.clone(),
            source,
        })?;

        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|source| StateFileError::Io {
                path: self.dir.clone(),
                source,
            })?;

        let tmp = self.path(&format!(".{name}.tmp"));
        tokio::fs::write(&tmp, &bytes)
            .await
            .map_err(|source| StateFileError::Io {
                path: tmp.clone(),
                source,
            })?;
        tokio::fs::rename(&tmp, &path)
            .await
            .map_err(|source| StateFileError::Io {
                path: path.clone(),
                source,
            })?;
        Ok(path)
    }
}

impl SessionStore for StateFileStore {
    async fn load(&self, name: &str) -> Result<Option<SessionState>, BridgeError> {
        let state = self.read(name).await?;
        tracing::debug!(dir = %self.dir.display(), name, found = state.is_some(), "state file loaded");
        Ok(state)
    }

    async fn save(&self, name: &str, state: &SessionState) -> Result<String, BridgeError> {
        let path = self.write(name, state).await?;
        tracing::debug!(path = %path.display(), "state file written");
        Ok(path.display().to_string())
    }
}
