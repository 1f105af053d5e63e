//! Application defaults.
//!
//! Only non-secret defaults live here. Credentials are typed into the
//! connection forms and held in memory for the lifetime of the window.

use std::path::PathBuf;

/// Default AWS region when the form leaves it blank.
pub const DEFAULT_REGION: &str = "us-east-1";
/// Default Unity Catalog catalog.
pub const DEFAULT_CATALOG: &str = "main";
/// Default schema inside the catalog.
pub const DEFAULT_SCHEMA: &str = "default";
/// Row cap applied when browsing a warehouse table.
pub const BROWSE_ROW_LIMIT: usize = 1000;

/// Non-secret defaults used to prefill the forms.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub default_region: String,
    pub default_catalog: String,
    pub default_schema: String,
    pub browse_row_limit: usize,
    /// Where downloaded objects are written. `None` when the platform has no
    /// download directory and none was configured.
    pub download_dir: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            default_region: DEFAULT_REGION.to_string(),
            default_catalog: DEFAULT_CATALOG.to_string(),
            default_schema: DEFAULT_SCHEMA.to_string(),
            browse_row_limit: BROWSE_ROW_LIMIT,
            download_dir: dirs::download_dir(),
        }
    }
}

impl AppConfig {
    /// Build the configuration from `BUCKETDESK_*` environment variables,
    /// falling back to defaults for anything unset or blank.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        Self {
            default_region: get("BUCKETDESK_REGION").unwrap_or(defaults.default_region),
            default_catalog: get("BUCKETDESK_CATALOG").unwrap_or(defaults.default_catalog),
            default_schema: get("BUCKETDESK_SCHEMA").unwrap_or(defaults.default_schema),
            browse_row_limit: defaults.browse_row_limit,
            download_dir: get("BUCKETDESK_DOWNLOAD_DIR")
                .map(PathBuf::from)
                .or(defaults.download_dir),
        }
    }
}
