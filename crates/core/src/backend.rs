use async_trait::async_trait;

use crate::error::BackendError;

/// A single key/value pair. Keys are slash-delimited paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub key: String,
    pub value: Vec<u8>,
}

impl Entry {
    pub fn new(key: impl Into<String>, value: impl Into<Vec<u8>>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Key/value persistence interface expected by the host.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Inserts or overwrites an entry.
    async fn put(&self, entry: &Entry) -> Result<(), BackendError>;

    /// Returns `Ok(None)` when the key does not exist.
    async fn get(&self, key: &str) -> Result<Option<Entry>, BackendError>;

    /// Deleting a missing key succeeds.
    async fn delete(&self, key: &str) -> Result<(), BackendError>;

    /// Names one level below `prefix`. Directories end with `/`.
    async fn list(&self, prefix: &str) -> Result<Vec<String>, BackendError>;
}
