//! Warehouse connection configuration.

use crate::services::config::{DEFAULT_CATALOG, DEFAULT_SCHEMA};

/// Connection settings for a Databricks SQL warehouse.
///
/// Held by the session only; the access token is never logged or printed.
#[derive(Clone, PartialEq, Eq)]
pub struct WarehouseConfig {
    /// Workspace hostname, e.g. `dbc-a1b2c3d4-e5f6.cloud.databricks.com`
    pub hostname: String,
    /// HTTP path of the warehouse, e.g. `/sql/1.0/warehouses/abc123`
    pub http_path: String,
    pub access_token: String,
    /// Catalog used to scope table listing and browsing
    pub catalog: String,
    /// Schema used to scope table listing and browsing
    pub schema: String,
}

impl std::fmt::Debug for WarehouseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WarehouseConfig")
            .field("hostname", &self.hostname)
            .field("http_path", &self.http_path)
            .field("access_token", &"<redacted>")
            .field("catalog", &self.catalog)
            .field("schema", &self.schema)
            .finish()
    }
}

impl WarehouseConfig {
    pub fn new(
        hostname: impl Into<String>,
        http_path: impl Into<String>,
        access_token: impl Into<String>,
    ) -> Self {
        Self {
            hostname: hostname.into(),
            http_path: http_path.into(),
            access_token: access_token.into(),
            catalog: DEFAULT_CATALOG.to_string(),
            schema: DEFAULT_SCHEMA.to_string(),
        }
    }

    pub fn with_scope(mut self, catalog: impl Into<String>, schema: impl Into<String>) -> Self {
        self.catalog = catalog.into();
        self.schema = schema.into();
        self
    }

    /// Check that every required field is filled in.
    ///
    /// Returns a message naming the first missing field.
    pub fn validate(&self) -> Result<(), String> {
        let required = [
            ("Server hostname", &self.hostname),
            ("HTTP path", &self.http_path),
            ("Access token", &self.access_token),
            ("Catalog", &self.catalog),
            ("Schema", &self.schema),
        ];

        for (label, value) in required {
            if value.trim().is_empty() {
                return Err(format!("{} is required", label));
            }
        }

        if self.warehouse_id().is_none() {
            return Err(format!(
                "HTTP path '{}' does not name a warehouse",
                self.http_path
            ));
        }

        Ok(())
    }

    pub fn is_complete(&self) -> bool {
        self.validate().is_ok()
    }

    /// Hostname without scheme or trailing slash.
    pub fn host(&self) -> &str {
        let host = self.hostname.trim();
        let host = host
            .strip_prefix("https://")
            .or_else(|| host.strip_prefix("http://"))
            .unwrap_or(host);
        host.trim_end_matches('/')
    }

    /// Base URL of the workspace REST API.
    pub fn base_url(&self) -> String {
        format!("https://{}", self.host())
    }

    /// Warehouse id: the last segment of the HTTP path.
    pub fn warehouse_id(&self) -> Option<&str> {
        self.http_path
            .trim()
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .filter(|id| !id.is_empty())
    }

    /// Short label for status lines.
    pub fn display_name(&self) -> String {
        format!("{} ({}.{})", self.host(), self.catalog, self.schema)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> WarehouseConfig {
        WarehouseConfig::new(
            "https://dbc-1234.cloud.databricks.com/",
            "/sql/1.0/warehouses/abc123",
            "dapi-secret",
        )
    }

    #[test]
    fn test_defaults_scope() {
        let config = config();
        assert_eq!(config.catalog, "main");
        assert_eq!(config.schema, "default");
        assert!(config.is_complete());
    }

    #[test]
    fn test_host_and_base_url() {
        let config = config();
        assert_eq!(config.host(), "dbc-1234.cloud.databricks.com");
        assert_eq!(config.base_url(), "https://dbc-1234.cloud.databricks.com");

        let bare = WarehouseConfig::new("dbc-1234.cloud.databricks.com", "/x/y", "t");
        assert_eq!(bare.host(), "dbc-1234.cloud.databricks.com");
    }

    #[test]
    fn test_warehouse_id() {
        assert_eq!(config().warehouse_id(), Some("abc123"));

        let trailing = WarehouseConfig::new("h", "/sql/1.0/warehouses/abc123/", "t");
        assert_eq!(trailing.warehouse_id(), Some("abc123"));

        let bare = WarehouseConfig::new("h", "abc123", "t");
        assert_eq!(bare.warehouse_id(), Some("abc123"));

        let slash = WarehouseConfig::new("h", "/", "t");
        assert_eq!(slash.warehouse_id(), None);
    }

    #[test]
    fn test_validate_reports_first_missing() {
        let config = WarehouseConfig::new("", "", "");
        assert_eq!(config.validate(), Err("Server hostname is required".to_string()));

        let config = WarehouseConfig::new("h", "/sql/1.0/warehouses/x", " ");
        assert_eq!(config.validate(), Err("Access token is required".to_string()));

        let config = WarehouseConfig::new("h", "/sql/1.0/warehouses/x", "t").with_scope("", "s");
        assert_eq!(config.validate(), Err("Catalog is required".to_string()));
    }

    #[test]
    fn test_debug_redacts_token() {
        let debug = format!("{:?}", config());
        assert!(!debug.contains("dapi-secret"));
        assert!(debug.contains("<redacted>"));
    }
}
