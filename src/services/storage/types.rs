//! Storage configuration and object types.

use std::path::Path;

use anyhow::{Result, anyhow};
use serde::{Deserialize, Serialize};

use crate::services::preview::FileKind;

use super::keys;

/// Connection settings for an S3 bucket, as typed into the storage form.
#[derive(Clone, PartialEq, Eq)]
pub struct StorageConfig {
    /// AWS access key id.
    pub access_key_id: String,
    /// AWS secret access key. Never logged.
    pub secret_access_key: String,
    /// AWS region (e.g., "us-east-1").
    pub region: String,
    /// Bucket name.
    pub bucket: String,
    /// Custom endpoint for S3-compatible services (MinIO, R2). `None` for AWS.
    pub endpoint: Option<String>,
}

impl std::fmt::Debug for StorageConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorageConfig")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"<redacted>")
            .field("region", &self.region)
            .field("bucket", &self.bucket)
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

impl StorageConfig {
    pub fn new(
        access_key_id: impl Into<String>,
        secret_access_key: impl Into<String>,
        region: impl Into<String>,
        bucket: impl Into<String>,
    ) -> Self {
        Self {
            access_key_id: access_key_id.into(),
            secret_access_key: secret_access_key.into(),
            region: region.into(),
            bucket: bucket.into(),
            endpoint: None,
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        let endpoint = endpoint.into();
        self.endpoint = if endpoint.trim().is_empty() {
            None
        } else {
            Some(endpoint)
        };
        self
    }

    /// Check that every required field is filled in.
    pub fn validate(&self) -> Result<(), String> {
        let required = [
            ("Access key ID", &self.access_key_id),
            ("Secret access key", &self.secret_access_key),
            ("Region", &self.region),
            ("Bucket name", &self.bucket),
        ];

        for (label, value) in required {
            if value.trim().is_empty() {
                return Err(format!("{} is required", label));
            }
        }
        Ok(())
    }

    pub fn is_complete(&self) -> bool {
        self.validate().is_ok()
    }
}

/// One object returned by a listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectInfo {
    /// Full key, relative to the bucket root.
    pub key: String,
    /// Last path segment of the key.
    pub name: String,
    /// Size in bytes.
    pub size: u64,
}

impl ObjectInfo {
    pub fn new(key: impl Into<String>, size: u64) -> Self {
        let key = key.into();
        let name = keys::file_name(&key).to_string();
        Self { key, name, size }
    }

    /// Get a human-readable size string.
    pub fn size_display(&self) -> String {
        match self.size {
            bytes if bytes >= 1_073_741_824 => {
                format!("{:.1} GB", bytes as f64 / 1_073_741_824.0)
            }
            bytes if bytes >= 1_048_576 => {
                format!("{:.1} MB", bytes as f64 / 1_048_576.0)
            }
            bytes if bytes >= 1024 => {
                format!("{:.1} KB", bytes as f64 / 1024.0)
            }
            bytes => format!("{} B", bytes),
        }
    }

    /// The preview kind for this object, if it has one.
    pub fn kind(&self) -> Option<FileKind> {
        FileKind::from_name(&self.key)
    }
}

/// A local file held in memory, ready to upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalFile {
    pub name: String,
    pub content: Vec<u8>,
}

impl LocalFile {
    /// Wrap in-memory content. Only `.csv`, `.pdf` and `.docx` are accepted.
    pub fn new(name: impl Into<String>, content: Vec<u8>) -> Result<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(anyhow!("File name is required"));
        }
        if FileKind::from_name(&name).is_none() {
            return Err(anyhow!(
                "Unsupported file type: {} (expected .csv, .pdf or .docx)",
                name
            ));
        }
        Ok(Self { name, content })
    }

    /// Read a file from disk.
    pub async fn from_path(path: &Path) -> Result<Self> {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| anyhow!("Invalid file path: {}", path.display()))?
            .to_string();

        // Reject before touching the disk
        if FileKind::from_name(&name).is_none() {
            return Self::new(name, Vec::new());
        }

        let content = async_fs::read(path)
            .await
            .map_err(|e| anyhow!("Failed to read {}: {}", path.display(), e))?;
        Self::new(name, content)
    }

    pub fn kind(&self) -> Option<FileKind> {
        FileKind::from_name(&self.name)
    }
}

/// Bytes fetched for download, with the suggested local file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Download {
    pub file_name: String,
    pub content: Vec<u8>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> StorageConfig {
        StorageConfig::new("AKIAEXAMPLE", "secret", "us-east-1", "my-bucket")
    }

    #[test]
    fn test_storage_config_validation() {
        assert!(config().validate().is_ok());

        let mut missing_bucket = config();
        missing_bucket.bucket = "".to_string();
        assert_eq!(
            missing_bucket.validate().unwrap_err(),
            "Bucket name is required"
        );

        let mut missing_secret = config();
        missing_secret.secret_access_key = "  ".to_string();
        assert!(!missing_secret.is_complete());
    }

    #[test]
    fn test_debug_redacts_secret() {
        let rendered = format!("{:?}", config());
        assert!(rendered.contains("AKIAEXAMPLE"));
        assert!(!rendered.contains("\"secret\""));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn test_blank_endpoint_is_none() {
        assert_eq!(config().with_endpoint("  ").endpoint, None);
        assert_eq!(
            config().with_endpoint("http://localhost:9000").endpoint.as_deref(),
            Some("http://localhost:9000")
        );
    }

    #[test]
    fn test_object_info_size_display() {
        assert_eq!(ObjectInfo::new("test.txt", 500).size_display(), "500 B");
        assert_eq!(ObjectInfo::new("test.txt", 1_500_000).size_display(), "1.4 MB");
        assert_eq!(
            ObjectInfo::new("test.txt", 2_500_000_000).size_display(),
            "2.3 GB"
        );
    }

    #[test]
    fn test_object_info_name_and_kind() {
        let obj = ObjectInfo::new("reports/2024/q1.csv", 10);
        assert_eq!(obj.name, "q1.csv");
        assert_eq!(obj.kind(), Some(FileKind::Csv));
        assert_eq!(ObjectInfo::new("reports/readme.md", 1).kind(), None);
    }

    #[test]
    fn test_local_file_rejects_unsupported() {
        assert!(LocalFile::new("data.csv", b"a\n1\n".to_vec()).is_ok());
        assert!(LocalFile::new("data.xlsx", vec![]).is_err());
        assert!(LocalFile::new("", vec![]).is_err());
    }

    #[test]
    fn test_local_file_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("upload.csv");
        std::fs::write(&path, b"a,b\n1,2\n").unwrap();

        let file = smol::block_on(LocalFile::from_path(&path)).unwrap();
        assert_eq!(file.name, "upload.csv");
        assert_eq!(file.content, b"a,b\n1,2\n");

        let other = dir.path().join("notes.txt");
        std::fs::write(&other, b"hi").unwrap();
        assert!(smol::block_on(LocalFile::from_path(&other)).is_err());
    }
}
