//! Directory-backed store: one file per key.

use std::path::PathBuf;

use async_trait::async_trait;
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use tokio::fs;

use crate::{KeyValueStore, StoreError};

/// Durable key-value store that keeps each key in its own file.
///
/// File names are the URL-safe base64 of the key, since keys such as
/// `@GoMarketPlace:products` are not portable file names. Writes land in a
/// temporary sibling first and are renamed into place.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Open (and create if needed) a store rooted at `root`.
    pub async fn open(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let root = root.into();
        fs::create_dir_all(&root)
            .await
            .map_err(|e| StoreError::OpenError(format!("{}: {}", root.display(), e)))?;
        tracing::debug!(root = %root.display(), "opened file store");
        Ok(Self { root })
    }

    /// Path of the file backing `key`.
    pub fn entry_path(&self, key: &str) -> PathBuf {
        self.root
            .join(format!("{}.json", URL_SAFE_NO_PAD.encode(key.as_bytes())))
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        match fs::read(self.entry_path(key)).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::ReadError {
                key: key.to_string(),
                reason: e.to_string(),
            }),
        }
    }

    async fn set(&self, key: &str, value: Vec<u8>) -> Result<(), StoreError> {
        let path = self.entry_path(key);
        let tmp = path.with_extension("json.tmp");
        let write_error = |e: std::io::Error| StoreError::WriteError {
            key: key.to_string(),
            reason: e.to_string(),
        };

        fs::write(&tmp, &value).await.map_err(write_error)?;
        fs::rename(&tmp, &path).await.map_err(write_error)?;
        Ok(())
    }
}
