use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{DirEntry, ObjectStore, StoreError};
use crate::path;

#[derive(Debug, Default)]
struct Tree {
    directories: BTreeSet<String>,
    objects: BTreeMap<String, Vec<u8>>,
}

impl Tree {
    fn is_dir(&self, path: &str) -> bool {
        path.is_empty() || self.directories.contains(path)
    }

    fn children(&self, dir: &str) -> Vec<DirEntry> {
        let prefix = if dir.is_empty() {
            String::new()
        } else {
            format!("{dir}/")
        };
        let direct = |p: &String| {
            p.strip_prefix(&prefix)
                .filter(|rest| !rest.is_empty() && !rest.contains('/'))
                .map(str::to_owned)
        };

        let mut entries: Vec<DirEntry> = self
            .directories
            .iter()
            .filter_map(direct)
            .map(DirEntry::directory)
            .chain(self.objects.keys().filter_map(direct).map(DirEntry::object))
            .collect();
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        entries
    }

    fn remove(&mut self, path: &str) -> Result<(), StoreError> {
        if self.objects.remove(path).is_some() {
            return Ok(());
        }
        if !self.directories.contains(path) {
            return Err(StoreError::not_found(format!("{path} was not found")));
        }
        if !self.children(path).is_empty() {
            return Err(StoreError::directory_not_empty(format!(
                "{path} is not empty"
            )));
        }
        self.directories.remove(path);
        Ok(())
    }
}

/// In-process store with the same strict rules as the remote service.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    tree: Arc<RwLock<Tree>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn contains_directory(&self, path: &str) -> bool {
        self.tree.read().await.directories.contains(path)
    }

    pub async fn object_count(&self) -> usize {
        self.tree.read().await.objects.len()
    }
}

#[async_trait]
impl ObjectStore for MemoryStore {
    async fn put_directory(&self, path: &str) -> Result<(), StoreError> {
        let mut tree = self.tree.write().await;
        if tree.is_dir(path) {
            return Ok(());
        }
        if tree.objects.contains_key(path) {
            return Err(StoreError::other(format!("{path} is an object")));
        }
        if !tree.is_dir(path::parent(path)) {
            return Err(StoreError::directory_missing(format!(
                "{} does not exist",
                path::parent(path)
            )));
        }
        tree.directories.insert(path.to_string());
        Ok(())
    }

    async fn put_object(&self, dir: &str, name: &str, data: &[u8]) -> Result<(), StoreError> {
        let mut tree = self.tree.write().await;
        if !tree.is_dir(dir) {
            return Err(StoreError::directory_missing(format!("{dir} does not exist")));
        }
        let full = path::join(dir, name);
        if tree.directories.contains(&full) {
            return Err(StoreError::other(format!("{full} is a directory")));
        }
        tree.objects.insert(full, data.to_vec());
        Ok(())
    }

    async fn get_object(&self, dir: &str, name: &str) -> Result<Option<Vec<u8>>, StoreError> {
        let tree = self.tree.read().await;
        let full = path::join(dir, name);
        match tree.objects.get(&full) {
            Some(data) => Ok(Some(data.clone())),
            None if tree.directories.contains(&full) => {
                Err(StoreError::other(format!("{full} is a directory")))
            }
            None => Err(StoreError::not_found(format!("{full} was not found"))),
        }
    }

    async fn delete_object(&self, dir: &str, name: &str) -> Result<(), StoreError> {
        self.tree.write().await.remove(&path::join(dir, name))
    }

    async fn delete_directory(&self, path: &str) -> Result<(), StoreError> {
        if path.is_empty() {
            return Ok(());
        }
        self.tree.write().await.remove(path)
    }

    async fn list_directory(&self, path: &str) -> Result<Vec<DirEntry>, StoreError> {
        let tree = self.tree.read().await;
        if tree.is_dir(path) {
            Ok(tree.children(path))
        } else if tree.objects.contains_key(path) {
            Err(StoreError::other(format!("{path} is not a directory")))
        } else {
            Err(StoreError::not_found(format!("{path} was not found")))
        }
    }
}
