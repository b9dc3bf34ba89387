use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use super::PersistenceError;

/// Whole-blob key/value storage. No partial reads or queries.
pub trait BlobStore {
    fn get(&self, key: &str) -> Result<Option<String>, PersistenceError>;
    fn set(&self, key: &str, blob: &str) -> Result<(), PersistenceError>;
}

#[derive(Debug, Default)]
pub struct MemoryBlobStore {
    blobs: Mutex<HashMap<String, String>>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_blob(key: &str, blob: impl Into<String>) -> Self {
        let store = Self::new();
        if let Ok(mut blobs) = store.blobs.lock() {
            blobs.insert(key.to_string(), blob.into());
        }
        store
    }
}

impl BlobStore for MemoryBlobStore {
    fn get(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        let blobs = self
            .blobs
            .lock()
            .map_err(|_| PersistenceError::Storage("Failed to acquire lock".to_string()))?;
        Ok(blobs.get(key).cloned())
    }

    fn set(&self, key: &str, blob: &str) -> Result<(), PersistenceError> {
        let mut blobs = self
            .blobs
            .lock()
            .map_err(|_| PersistenceError::Storage("Failed to acquire lock".to_string()))?;
        blobs.insert(key.to_string(), blob.to_string());
        Ok(())
    }
}

/// One `<dir>/<key>.json` file per key.
#[derive(Debug, Clone)]
pub struct FileBlobStore {
    dir: PathBuf,
}

impl FileBlobStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, PersistenceError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');

        if !valid {
            return Err(PersistenceError::Storage(format!("Invalid storage key '{}'", key)));
        }

        Ok(self.dir.join(format!("{}.json", key)))
    }
}

impl BlobStore for FileBlobStore {
    fn get(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        let path = self.path_for(key)?;
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(std::fs::read_to_string(path)?))
    }

    fn set(&self, key: &str, blob: &str) -> Result<(), PersistenceError> {
        let path = self.path_for(key)?;
        std::fs::create_dir_all(&self.dir)?;

        let staging = path.with_extension("json.tmp");
        std::fs::write(&staging, blob)?;
        std::fs::rename(&staging, &path)?;
        Ok(())
    }
}
