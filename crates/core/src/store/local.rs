use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;

use super::{DirEntry, ObjectStore, StoreError};
use crate::path;

/// Store rooted at a directory on the local filesystem.
pub struct LocalStore {
    root: PathBuf,
}

impl LocalStore {
    /// Opens the store, creating the root directory if needed.
    pub fn init(path: impl AsRef<Path>) -> io::Result<Self> {
        let root = path.as_ref().to_path_buf();
        std::fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    fn full_path(&self, path: &str) -> PathBuf {
        path::components(path).fold(self.root.clone(), |acc, c| acc.join(c))
    }
}

fn classify(err: io::Error, full: &Path) -> StoreError {
    let message = format!("{}: {err}", full.display());
    match err.kind() {
        io::ErrorKind::NotFound => StoreError::not_found(message),
        io::ErrorKind::DirectoryNotEmpty => StoreError::directory_not_empty(message),
        _ => StoreError::other(message),
    }
}

/// Writes below `dir` report a missing directory rather than a missing file.
fn classify_write(err: io::Error, full: &Path) -> StoreError {
    if err.kind() == io::ErrorKind::NotFound {
        StoreError::directory_missing(format!("{}: {err}", full.display()))
    } else {
        classify(err, full)
    }
}

#[async_trait]
impl ObjectStore for LocalStore {
    async fn put_directory(&self, path: &str) -> Result<(), StoreError> {
        let full = self.full_path(path);
        match tokio::fs::create_dir(&full).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::AlreadyExists && full.is_dir() => Ok(()),
            Err(err) => Err(classify_write(err, &full)),
        }
    }

    async fn put_object(&self, dir: &str, name: &str, data: &[u8]) -> Result<(), StoreError> {
        let full = self.full_path(&path::join(dir, name));
        tokio::fs::write(&full, data)
            .await
            .map_err(|err| classify_write(err, &full))
    }

    async fn get_object(&self, dir: &str, name: &str) -> Result<Option<Vec<u8>>, StoreError> {
        let full = self.full_path(&path::join(dir, name));
        tokio::fs::read(&full)
            .await
            .map(Some)
            .map_err(|err| classify(err, &full))
    }

    async fn delete_object(&self, dir: &str, name: &str) -> Result<(), StoreError> {
        let full = self.full_path(&path::join(dir, name));
        let metadata = tokio::fs::symlink_metadata(&full)
            .await
            .map_err(|err| classify(err, &full))?;
        let removed = if metadata.is_dir() {
            tokio::fs::remove_dir(&full).await
        } else {
            tokio::fs::remove_file(&full).await
        };
        removed.map_err(|err| classify(err, &full))
    }

    async fn delete_directory(&self, path: &str) -> Result<(), StoreError> {
        if path::components(path).next().is_none() {
            return Ok(());
        }
        let full = self.full_path(path);
        tokio::fs::remove_dir(&full)
            .await
            .map_err(|err| classify(err, &full))
    }

    async fn list_directory(&self, path: &str) -> Result<Vec<DirEntry>, StoreError> {
        let dir = self.full_path(path);
        let mut read_dir = tokio::fs::read_dir(&dir)
            .await
            .map_err(|err| classify(err, &dir))?;
        let mut entries = Vec::new();
        while let Some(entry) = read_dir
            .next_entry()
            .await
            .map_err(|err| classify(err, &dir))?
        {
            let Some(name) = entry.file_name().to_str().map(str::to_owned) else {
                continue;
            };
            let file_type = entry
                .file_type()
                .await
                .map_err(|err| classify(err, &entry.path()))?;
            if file_type.is_dir() {
                entries.push(DirEntry::directory(name));
            } else {
                entries.push(DirEntry::object(name));
            }
        }
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }
}
