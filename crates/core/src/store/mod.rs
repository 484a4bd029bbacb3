pub mod local;
pub mod memory;

use std::fmt;

use async_trait::async_trait;
use thiserror::Error;

/// Failure classes the adapter reacts to. Everything else is `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreErrorKind {
    NotFound,
    DirectoryMissing,
    DirectoryNotEmpty,
    Other,
}

impl fmt::Display for StoreErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreErrorKind::NotFound => write!(f, "not found"),
            StoreErrorKind::DirectoryMissing => write!(f, "directory does not exist"),
            StoreErrorKind::DirectoryNotEmpty => write!(f, "directory not empty"),
            StoreErrorKind::Other => write!(f, "store error"),
        }
    }
}

#[derive(Debug, Clone, Error)]
#[error("{kind}: {message}")]
pub struct StoreError {
    kind: StoreErrorKind,
    message: String,
}

impl StoreError {
    pub fn new(kind: StoreErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StoreErrorKind::NotFound, message)
    }

    pub fn directory_missing(message: impl Into<String>) -> Self {
        Self::new(StoreErrorKind::DirectoryMissing, message)
    }

    pub fn directory_not_empty(message: impl Into<String>) -> Self {
        Self::new(StoreErrorKind::DirectoryNotEmpty, message)
    }

    pub fn other(message: impl Into<String>) -> Self {
        Self::new(StoreErrorKind::Other, message)
    }

    pub fn kind(&self) -> StoreErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn is_not_found(&self) -> bool {
        self.kind == StoreErrorKind::NotFound
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Directory,
    Object,
}

/// One immediate child of a listed directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    pub name: String,
    pub kind: EntryKind,
}

impl DirEntry {
    pub fn directory(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: EntryKind::Directory,
        }
    }

    pub fn object(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: EntryKind::Object,
        }
    }

    pub fn is_directory(&self) -> bool {
        self.kind == EntryKind::Directory
    }
}

/// Directory/object primitives of the remote store.
///
/// Paths are slash-joined and relative to the store root, without a
/// leading slash. The empty path is the root, which always exists.
/// Implementations never create missing parents on their own: a write
/// below a missing directory fails with [`StoreErrorKind::DirectoryMissing`].
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Creates `path`. Creating an existing directory succeeds.
    async fn put_directory(&self, path: &str) -> Result<(), StoreError>;

    async fn put_object(&self, dir: &str, name: &str, data: &[u8]) -> Result<(), StoreError>;

    /// `Ok(None)` means the store answered successfully without a payload.
    async fn get_object(&self, dir: &str, name: &str) -> Result<Option<Vec<u8>>, StoreError>;

    /// Deletes an object, or an empty directory addressed as `dir/name`.
    async fn delete_object(&self, dir: &str, name: &str) -> Result<(), StoreError>;

    /// Deleting the root is a no-op.
    async fn delete_directory(&self, path: &str) -> Result<(), StoreError>;

    async fn list_directory(&self, path: &str) -> Result<Vec<DirEntry>, StoreError>;
}
