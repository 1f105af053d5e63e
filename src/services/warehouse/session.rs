//! Warehouse operations the shell triggers.

use anyhow::{Result, anyhow};

use super::factory::WarehouseFactory;
use super::sql;
use super::traits::{BoxedWarehouseConnection, SelectResult, Statement, WarehouseConnection};
use super::types::WarehouseConfig;
use super::upload::{self, UploadReport};
use crate::services::config::BROWSE_ROW_LIMIT;
use crate::services::preview::TablePreview;

/// Table names in the configured catalog and schema, in service order.
pub async fn list_tables(conn: &dyn WarehouseConnection) -> Result<Vec<String>> {
    let config = conn.warehouse_config();
    let result = conn
        .execute(&sql::show_tables(&config.catalog, &config.schema))
        .await?;
    result.column_strings("tableName")
}

/// First `limit` rows of a table.
pub async fn browse_table(
    conn: &dyn WarehouseConnection,
    table: &str,
    limit: usize,
) -> Result<SelectResult> {
    if table.trim().is_empty() {
        return Err(anyhow!("No table selected"));
    }

    let config = conn.warehouse_config();
    conn.execute(&sql::browse_table(&config.catalog, &config.schema, table, limit))
        .await
}

/// Run caller SQL and return the full result set.
pub async fn run_query(conn: &dyn WarehouseConnection, query: &str) -> Result<SelectResult> {
    let query = query.trim();
    if query.is_empty() {
        return Err(anyhow!("Empty query"));
    }

    conn.execute(&Statement::new(query)).await
}

/// Warehouse configuration plus the operations that use it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WarehouseSession {
    config: WarehouseConfig,
    browse_limit: usize,
}

impl WarehouseSession {
    /// Start a session; fails if the configuration is incomplete.
    pub fn new(config: WarehouseConfig) -> Result<Self> {
        config.validate().map_err(|e| anyhow!(e))?;
        Ok(Self {
            config,
            browse_limit: BROWSE_ROW_LIMIT,
        })
    }

    pub fn with_browse_limit(mut self, limit: usize) -> Self {
        self.browse_limit = limit;
        self
    }

    pub fn config(&self) -> &WarehouseConfig {
        &self.config
    }

    fn connect(&self) -> Result<BoxedWarehouseConnection> {
        WarehouseFactory::create(&self.config)
    }

    pub async fn test_connection(&self) -> Result<()> {
        self.connect()?.test_connection().await
    }

    pub async fn list_tables(&self) -> Result<Vec<String>> {
        list_tables(self.connect()?.as_ref()).await
    }

    pub async fn browse_table(&self, table: &str) -> Result<SelectResult> {
        browse_table(self.connect()?.as_ref(), table, self.browse_limit).await
    }

    pub async fn run_query(&self, query: &str) -> Result<SelectResult> {
        run_query(self.connect()?.as_ref(), query).await
    }

    pub async fn upload_rows(&self, table: &str, data: &TablePreview) -> Result<UploadReport> {
        let conn = self.connect()?;
        Ok(upload::upload_rows(conn.as_ref(), table, data).await?)
    }

    pub async fn upload_csv(&self, table: &str, content: &[u8]) -> Result<UploadReport> {
        upload::upload_csv(self.connect()?.as_ref(), table, content).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::warehouse::fake::RecordingWarehouse;
    use crate::services::warehouse::row::{ColumnInfo, Row, Value};

    fn show_tables_result() -> RecordingWarehouse {
        RecordingWarehouse::new().with_result(
            vec![
                ColumnInfo::new("database", "STRING", 0),
                ColumnInfo::new("tableName", "STRING", 1),
                ColumnInfo::new("isTemporary", "BOOLEAN", 2),
            ],
            vec![
                Row::from_values(vec!["default".into(), "orders".into(), Value::Bool(false)]),
                Row::from_values(vec!["default".into(), "customers".into(), Value::Bool(false)]),
            ],
        )
    }

    #[test]
    fn test_list_tables() {
        let conn = show_tables_result();
        let tables = smol::block_on(list_tables(&conn)).unwrap();
        assert_eq!(tables, vec!["orders", "customers"]);
        assert_eq!(conn.attempted()[0].sql, "SHOW TABLES IN `main`.`default`");
    }

    #[test]
    fn test_list_tables_without_table_name_column() {
        let conn = RecordingWarehouse::new()
            .with_result(vec![ColumnInfo::new("name", "STRING", 0)], vec![]);
        assert!(smol::block_on(list_tables(&conn)).is_err());
    }

    #[test]
    fn test_browse_table_applies_limit() {
        let conn = RecordingWarehouse::new();
        smol::block_on(browse_table(&conn, "orders", 1000)).unwrap();
        assert_eq!(
            conn.attempted()[0].sql,
            "SELECT * FROM `main`.`default`.`orders` LIMIT 1000"
        );
    }

    #[test]
    fn test_browse_table_requires_name() {
        let conn = RecordingWarehouse::new();
        assert!(smol::block_on(browse_table(&conn, " ", 1000)).is_err());
        assert!(conn.attempted().is_empty());
    }

    #[test]
    fn test_run_query_passes_sql_through() {
        let conn = RecordingWarehouse::new();
        let result = smol::block_on(run_query(&conn, "  SELECT 1 AS one\n")).unwrap();
        assert_eq!(result.original_query, "SELECT 1 AS one");
        assert!(conn.attempted()[0].parameters.is_empty());
    }

    #[test]
    fn test_run_query_rejects_empty() {
        let conn = RecordingWarehouse::new();
        assert!(smol::block_on(run_query(&conn, "   ")).is_err());
    }

    #[test]
    fn test_session_requires_complete_config() {
        let incomplete = WarehouseConfig::new("host", "/sql/1.0/warehouses/x", "");
        assert!(WarehouseSession::new(incomplete).is_err());

        let complete = WarehouseConfig::new("host", "/sql/1.0/warehouses/x", "t");
        let session = WarehouseSession::new(complete).unwrap().with_browse_limit(10);
        assert_eq!(session.browse_limit, 10);
    }
}
