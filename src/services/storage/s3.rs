//! S3 storage implementation using OpenDAL.
//!
//! Works against Amazon S3 and S3-compatible services (MinIO, Cloudflare R2)
//! when an endpoint is configured.

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use futures::StreamExt;
use opendal::layers::LoggingLayer;
use opendal::services::S3;
use opendal::Operator;

use super::keys;
use super::traits::{BoxedStorageConnection, StorageConnection};
use super::types::{ObjectInfo, StorageConfig};

/// S3 storage connection implementation.
///
/// Holds a ready OpenDAL operator built from the configuration.
pub struct S3Storage {
    config: StorageConfig,
    operator: Operator,
}

impl S3Storage {
    /// Build an S3 client from the configuration.
    pub fn new(config: StorageConfig) -> Result<Self> {
        let operator = Self::build_operator(&config)?;
        Ok(Self { config, operator })
    }

    /// Create a boxed S3 storage connection.
    pub fn boxed(config: StorageConfig) -> Result<BoxedStorageConnection> {
        Ok(Box::new(Self::new(config)?))
    }

    /// Wrap an already configured operator, e.g. an in-memory one.
    pub fn from_operator(config: StorageConfig, operator: Operator) -> Self {
        Self { config, operator }
    }

    fn build_operator(config: &StorageConfig) -> Result<Operator> {
        let mut builder = S3::default()
            .bucket(&config.bucket)
            .region(&config.region)
            .access_key_id(&config.access_key_id)
            .secret_access_key(&config.secret_access_key)
            // Credentials come from the form only, never from ~/.aws or env
            .disable_config_load();

        if let Some(endpoint) = config.endpoint.as_deref() {
            builder = builder.endpoint(endpoint);
        }

        let op = Operator::new(builder)?
            .layer(LoggingLayer::default())
            .finish();

        Ok(op)
    }

    /// Root path argument for a recursive listing of `dir`.
    fn list_root(dir: &str) -> &str {
        if dir.is_empty() { "/" } else { dir }
    }
}

/// Apply the listing rule to raw `(key, size)` pairs from the service.
///
/// Keeps keys starting with `prefix`, drops the prefix key itself and every
/// directory marker, and preserves the input order.
pub fn filter_listing(
    prefix: &str,
    entries: impl IntoIterator<Item = (String, u64)>,
) -> Vec<ObjectInfo> {
    entries
        .into_iter()
        .filter(|(key, _)| {
            key.starts_with(prefix) && key != prefix && !keys::is_dir_marker(key)
        })
        .map(|(key, size)| ObjectInfo::new(key, size))
        .collect()
}

#[async_trait]
impl StorageConnection for S3Storage {
    fn storage_config(&self) -> &StorageConfig {
        &self.config
    }

    async fn test_connection(&self) -> Result<()> {
        self.operator.check().await.map_err(|e| {
            anyhow!(
                "Connection test failed: {}. Check your credentials and bucket access.",
                e
            )
        })?;
        Ok(())
    }

    async fn list(&self, prefix: &str) -> Result<Vec<ObjectInfo>> {
        let prefix = keys::normalize_path(prefix);
        let root = Self::list_root(keys::parent_dir(prefix));

        let mut lister = self.operator.lister_with(root).recursive(true).await?;
        let mut entries = Vec::new();

        while let Some(entry) = lister.next().await {
            let entry = entry?;
            let path = entry.path().to_string();
            if !path.starts_with(prefix) {
                continue;
            }

            // Sizes come from the listing itself; S3 returns them per key
            let size = entry.metadata().content_length();
            entries.push((path, size));
        }

        let objects = filter_listing(prefix, entries);
        tracing::debug!("Listed {} objects under '{}'", objects.len(), prefix);
        Ok(objects)
    }

    async fn read(&self, key: &str) -> Result<Vec<u8>> {
        let key = keys::normalize_path(key);
        let data = self.operator.read(key).await?.to_vec();
        Ok(data)
    }

    async fn write(&self, key: &str, data: Vec<u8>) -> Result<()> {
        let key = keys::normalize_path(key);
        self.operator.write(key, data).await?;
        Ok(())
    }

    fn object_uri(&self, key: &str) -> String {
        format!("s3://{}/{}", self.config.bucket, keys::normalize_path(key))
    }
}
