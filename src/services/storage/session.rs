//! Storage operations the shell triggers.
//!
//! The free functions take any [`StorageConnection`]; [`StorageSession`]
//! builds a fresh client from its configuration for every call.

use std::path::{Path, PathBuf};

use anyhow::{Result, anyhow};

use crate::services::preview::{self, Preview};

use super::factory::StorageFactory;
use super::keys;
use super::traits::{BoxedStorageConnection, StorageConnection};
use super::types::{Download, LocalFile, ObjectInfo, StorageConfig};

/// List the files under a folder prefix.
pub async fn list_files(storage: &dyn StorageConnection, prefix: &str) -> Result<Vec<ObjectInfo>> {
    storage.list(prefix).await
}

/// Fetch an object for download.
pub async fn download(storage: &dyn StorageConnection, key: &str) -> Result<Download> {
    let content = storage.read(key).await?;
    Ok(Download {
        file_name: keys::file_name(key).to_string(),
        content,
    })
}

/// Store a local file under `prefix`, overwriting any object at that key.
///
/// Returns the key that was written.
pub async fn upload(
    storage: &dyn StorageConnection,
    prefix: &str,
    file: &LocalFile,
) -> Result<String> {
    let key = keys::join_key(prefix, &file.name);
    storage.write(&key, file.content.clone()).await?;
    tracing::info!("Uploaded {} to {}", file.name, storage.object_uri(&key));
    Ok(key)
}

/// Fetch an object and render it.
pub async fn preview_object(storage: &dyn StorageConnection, key: &str) -> Result<Preview> {
    let content = storage.read(key).await?;
    Ok(preview::preview(&content, key))
}

/// Write downloaded bytes into `dir`, returning the path written.
pub async fn save_download(download: &Download, dir: &Path) -> Result<PathBuf> {
    if download.file_name.is_empty() {
        return Err(anyhow!("Nothing to save: the object key has no file name"));
    }

    async_fs::create_dir_all(dir)
        .await
        .map_err(|e| anyhow!("Failed to create {}: {}", dir.display(), e))?;

    let path = dir.join(&download.file_name);
    async_fs::write(&path, &download.content)
        .await
        .map_err(|e| anyhow!("Failed to write {}: {}", path.display(), e))?;

    tracing::info!("Saved {} ({} bytes)", path.display(), download.content.len());
    Ok(path)
}

/// Storage configuration plus the operations that use it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageSession {
    config: StorageConfig,
}

impl StorageSession {
    /// Start a session; fails if the configuration is incomplete.
    pub fn new(config: StorageConfig) -> Result<Self> {
        config.validate().map_err(|e| anyhow!(e))?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &StorageConfig {
        &self.config
    }

    fn connect(&self) -> Result<BoxedStorageConnection> {
        StorageFactory::create(&self.config)
    }

    pub async fn test_connection(&self) -> Result<()> {
        self.connect()?.test_connection().await
    }

    pub async fn list(&self, prefix: &str) -> Result<Vec<ObjectInfo>> {
        list_files(self.connect()?.as_ref(), prefix).await
    }

    pub async fn download(&self, key: &str) -> Result<Download> {
        download(self.connect()?.as_ref(), key).await
    }

    pub async fn upload(&self, prefix: &str, file: &LocalFile) -> Result<String> {
        upload(self.connect()?.as_ref(), prefix, file).await
    }

    pub async fn preview(&self, key: &str) -> Result<Preview> {
        preview_object(self.connect()?.as_ref(), key).await
    }
}
