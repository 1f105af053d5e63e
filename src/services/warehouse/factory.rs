//! Warehouse connection factory.

use anyhow::{Result, anyhow};

use super::databricks::DatabricksConnection;
use super::traits::BoxedWarehouseConnection;
use super::types::WarehouseConfig;

/// Factory for creating warehouse clients from configuration.
pub struct WarehouseFactory;

impl WarehouseFactory {
    /// Create a warehouse client for the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error naming the first missing required field.
    pub fn create(config: &WarehouseConfig) -> Result<BoxedWarehouseConnection> {
        config.validate().map_err(|e| anyhow!(e))?;
        Ok(DatabricksConnection::boxed(config.clone()))
    }
}
