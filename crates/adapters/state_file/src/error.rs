//! State file error types.

use std::path::PathBuf;

use thinq_bridge_domain::error::BridgeError;

/// Errors originating from the state file store.
#[derive(Debug, thiserror::Error)]
pub enum StateFileError {
    /// Reading, writing or renaming a file failed.
    #[error("state file io error on {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file does not hold a valid session state.
    #[error("state file {path} is not valid JSON")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl StateFileError {
    /// Convert into a [`BridgeError::Storage`] for propagation across port
    /// boundaries.
    pub fn into_domain(self) -> BridgeError {
        BridgeError::Storage(Box::new(self))
    }
}

impl From<StateFileError> for BridgeError {
    fn from(err: StateFileError) -> Self {
        err.into_domain()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_name_the_file_in_message() {
        let err = StateFileError::Io {
            path: PathBuf::from("/tmp/wideq_state.json"),
            source: std::io::Error::other("denied"),
        };
        assert_eq!(
            err.to_string(),
            "state file io error on /tmp/wideq_state.json"
        );
    }

    #[test]
    fn should_convert_to_storage_error() {
        let err: BridgeError = StateFileError::Io {
            path: PathBuf::from("x"),
            source: std::io::Error::other("denied"),
        }
        .into();
        assert!(matches!(err, BridgeError::Storage(_)));
    }
}
