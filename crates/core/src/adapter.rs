//! Key/value backend over a directory-based object store.
//!
//! A key `a/b/c` lives as object `c` inside directory `<base>/a/b`.
//! The store has no implicit parents, so `put` creates missing
//! directories top-down on demand, and `delete` falls back to a
//! depth-first removal when the key turns out to name a non-empty
//! directory.

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use futures::FutureExt;
use futures::future::BoxFuture;
use tracing::{debug, warn};

use crate::backend::{Backend, Entry};
use crate::error::BackendError;
use crate::path;
use crate::store::{ObjectStore, StoreErrorKind};

pub struct ObjectStoreBackend {
    store: Arc<dyn ObjectStore>,
    base: String,
}

impl ObjectStoreBackend {
    pub fn new(store: Arc<dyn ObjectStore>, base_directory: &str) -> Self {
        Self {
            store,
            base: path::join(base_directory, ""),
        }
    }

    /// Removes everything below `prefix`, then `prefix` itself unless it
    /// is the store root. A missing directory counts as removed.
    pub async fn remove_tree(&self, prefix: &str) -> Result<(), BackendError> {
        if path::has_parent_ref(prefix) {
            return Err(BackendError::invalid_key(prefix, "contains '..'"));
        }
        let dir = path::join(&self.base, prefix);
        self.delete_tree(&dir).await
    }

    /// Resolves a key to `(directory, object name)` inside the base directory.
    fn locate(&self, key: &str) -> Result<(String, String), BackendError> {
        if path::has_parent_ref(key) {
            return Err(BackendError::invalid_key(key, "contains '..'"));
        }
        let (dir, leaf) = path::split_key(key);
        if leaf.is_empty() || leaf == "." {
            return Err(BackendError::invalid_key(key, "missing object name"));
        }
        Ok((path::join(&self.base, dir), leaf.to_string()))
    }

    fn make_dir<'a>(&'a self, dir: &'a str) -> BoxFuture<'a, Result<(), BackendError>> {
        async move {
            if dir.is_empty() {
                return Ok(());
            }
            debug!(dir, "creating directory");
            match self.store.put_directory(dir).await {
                Ok(()) => Ok(()),
                Err(err) if err.kind() == StoreErrorKind::DirectoryMissing => {
                    let parent = path::parent(dir);
                    if parent.is_empty() {
                        return Err(BackendError::storage("mkdir", dir, err));
                    }
                    self.make_dir(parent).await?;
                    self.store
                        .put_directory(dir)
                        .await
                        .map_err(|err| BackendError::storage("mkdir", dir, err))
                }
                Err(err) => Err(BackendError::storage("mkdir", dir, err)),
            }
        }
        .boxed()
    }

    fn delete_tree<'a>(&'a self, dir: &'a str) -> BoxFuture<'a, Result<(), BackendError>> {
        async move {
            let entries = match self.store.list_directory(dir).await {
                Ok(entries) => entries,
                Err(err) if err.is_not_found() => return Ok(()),
                Err(err) => return Err(BackendError::storage("list", dir, err)),
            };

            for entry in entries {
                if entry.is_directory() {
                    let sub = path::join(dir, &entry.name);
                    self.delete_tree(&sub).await?;
                } else {
                    match self.store.delete_object(dir, &entry.name).await {
                        Ok(()) => {}
                        Err(err) if err.is_not_found() => {}
                        Err(err) => {
                            return Err(BackendError::storage(
                                "delete",
                                path::join(dir, &entry.name),
                                err,
                            ));
                        }
                    }
                }
            }

            // The store root always exists and is never removed.
            if dir.is_empty() {
                return Ok(());
            }
            debug!(dir, "removing directory");
            match self.store.delete_directory(dir).await {
                Ok(()) => Ok(()),
                Err(err) if err.is_not_found() => Ok(()),
                Err(err) => Err(BackendError::storage("rmdir", dir, err)),
            }
        }
        .boxed()
    }
}

#[async_trait]
impl Backend for ObjectStoreBackend {
    async fn put(&self, entry: &Entry) -> Result<(), BackendError> {
        let started = Instant::now();
        let (dir, name) = self.locate(&entry.key)?;

        self.make_dir(&dir).await?;
        self.store
            .put_object(&dir, &name, &entry.value)
            .await
            .map_err(|err| BackendError::storage("put", path::join(&dir, &name), err))?;

        debug!(key = %entry.key, size = entry.value.len(), elapsed = ?started.elapsed(), "put");
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<Entry>, BackendError> {
        let started = Instant::now();
        let (dir, name) = self.locate(key)?;

        let value = match self.store.get_object(&dir, &name).await {
            Ok(Some(value)) => value,
            Ok(None) => {
                return Err(BackendError::EmptyResponse {
                    path: path::join(&dir, &name),
                });
            }
            Err(err) if err.is_not_found() => {
                debug!(key, elapsed = ?started.elapsed(), "get: not found");
                return Ok(None);
            }
            Err(err) => return Err(BackendError::storage("get", path::join(&dir, &name), err)),
        };

        debug!(key, size = value.len(), elapsed = ?started.elapsed(), "get");
        Ok(Some(Entry::new(key, value)))
    }

    async fn delete(&self, key: &str) -> Result<(), BackendError> {
        let started = Instant::now();
        let (dir, name) = self.locate(key)?;

        match self.store.delete_object(&dir, &name).await {
            Ok(()) => {}
            Err(err) if err.is_not_found() => {}
            Err(err) if err.kind() == StoreErrorKind::DirectoryNotEmpty => {
                debug!(key, "key names a non-empty directory, removing recursively");
                self.delete_tree(&path::join(&dir, &name)).await?;
            }
            Err(err) => {
                return Err(BackendError::storage("delete", path::join(&dir, &name), err));
            }
        }

        debug!(key, elapsed = ?started.elapsed(), "delete");
        Ok(())
    }

    async fn list(&self, prefix: &str) -> Result<Vec<String>, BackendError> {
        let started = Instant::now();
        if path::has_parent_ref(prefix) {
            return Err(BackendError::invalid_key(prefix, "contains '..'"));
        }
        let dir = path::join(&self.base, prefix);

        // Listing failures degrade to an empty result.
        let entries = match self.store.list_directory(&dir).await {
            Ok(entries) => entries,
            Err(err) if err.is_not_found() => Vec::new(),
            Err(err) => {
                warn!(dir = %dir, error = %err, "listing failed, returning no keys");
                Vec::new()
            }
        };

        let mut names: Vec<String> = entries
            .into_iter()
            .map(|entry| {
                if entry.is_directory() {
                    format!("{}/", entry.name)
                } else {
                    entry.name
                }
            })
            .collect();
        names.sort();

        debug!(prefix, count = names.len(), elapsed = ?started.elapsed(), "list");
        Ok(names)
    }
}
