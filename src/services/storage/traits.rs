//! Storage connection traits.

use anyhow::Result;
use async_trait::async_trait;

use super::types::{ObjectInfo, StorageConfig};

/// Core trait for object storage clients.
///
/// A client is built from a [`StorageConfig`] for one operation and dropped
/// afterwards; implementations hold no session state of their own.
///
/// # Example
///
/// ```ignore
/// use bucketdesk::services::storage::{StorageConfig, StorageFactory};
///
/// let config = StorageConfig::new("AKIA...", "secret", "us-east-1", "my-bucket");
/// let storage = StorageFactory::create(&config)?;
///
/// for obj in storage.list("reports/").await? {
///     println!("{}: {}", obj.key, obj.size_display());
/// }
/// ```
#[async_trait]
pub trait StorageConnection: Send + Sync {
    /// Get the configuration this client was built from.
    fn storage_config(&self) -> &StorageConfig;

    /// Verify that the bucket is reachable with the configured credentials.
    async fn test_connection(&self) -> Result<()>;

    /// List every object whose key starts with `prefix`.
    ///
    /// The prefix key itself and directory markers (keys ending in `/`) are
    /// excluded. Entries keep the order the service returned them in.
    async fn list(&self, prefix: &str) -> Result<Vec<ObjectInfo>>;

    /// Read the full contents of an object.
    async fn read(&self, key: &str) -> Result<Vec<u8>>;

    /// Write an object, replacing any existing object at `key`.
    async fn write(&self, key: &str, data: Vec<u8>) -> Result<()>;

    /// Get the full URI for an object (e.g., "s3://bucket/path/to/object").
    fn object_uri(&self, key: &str) -> String;
}

/// A boxed storage connection for dynamic dispatch.
pub type BoxedStorageConnection = Box<dyn StorageConnection>;
