//! Storage connection factory.

use anyhow::{Result, anyhow};

use super::s3::S3Storage;
use super::traits::BoxedStorageConnection;
use super::types::StorageConfig;

/// Factory for creating storage clients from configuration.
///
/// # Example
///
/// ```ignore
/// use bucketdesk::services::storage::{StorageConfig, StorageFactory};
///
/// let config = StorageConfig::new("AKIA...", "secret", "us-east-1", "my-bucket");
/// let connection = StorageFactory::create(&config)?;
/// ```
pub struct StorageFactory;

impl StorageFactory {
    /// Create a ready storage client for the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if a required field is missing or the client cannot
    /// be constructed from the given values.
    pub fn create(config: &StorageConfig) -> Result<BoxedStorageConnection> {
        config.validate().map_err(|e| anyhow!(e))?;
        S3Storage::boxed(config.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factory_validates_config() {
        let config = StorageConfig::new("AKIAEXAMPLE", "secret", "us-east-1", "");
        let result = StorageFactory::create(&config);
        assert!(result.is_err());
    }

    #[test]
    fn test_factory_creates_s3() {
        let config = StorageConfig::new("AKIAEXAMPLE", "secret", "us-east-1", "my-bucket");
        let connection = StorageFactory::create(&config).unwrap();
        assert_eq!(connection.storage_config().bucket, "my-bucket");
        assert_eq!(connection.object_uri("a.csv"), "s3://my-bucket/a.csv");
    }
}
