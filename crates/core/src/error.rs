use thiserror::Error;

use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("invalid key {key:?}: {reason}")]
    InvalidKey { key: String, reason: &'static str },

    #[error("{op} {path} failed: {source}")]
    Storage {
        op: &'static str,
        path: String,
        #[source]
        source: StoreError,
    },

    #[error("got empty response for {path} but no not-found error")]
    EmptyResponse { path: String },
}

impl BackendError {
    pub(crate) fn storage(op: &'static str, path: impl Into<String>, source: StoreError) -> Self {
        BackendError::Storage {
            op,
            path: path.into(),
            source,
        }
    }

    pub(crate) fn invalid_key(key: &str, reason: &'static str) -> Self {
        BackendError::InvalidKey {
            key: key.to_string(),
            reason,
        }
    }
}
