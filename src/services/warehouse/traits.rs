//! Warehouse connection trait and statement/result types.

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use serde::Serialize;

use super::row::{ColumnInfo, Row};
use super::types::WarehouseConfig;
use crate::services::preview::TablePreview;

/// A named parameter bound to a statement.
///
/// A `None` value is sent as SQL `NULL`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatementParameter {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(rename = "type")]
    pub type_name: String,
}

impl StatementParameter {
    pub fn new(
        name: impl Into<String>,
        value: Option<String>,
        type_name: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            value,
            type_name: type_name.into(),
        }
    }
}

/// SQL text plus its bound parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    pub sql: String,
    pub parameters: Vec<StatementParameter>,
}

impl Statement {
    pub fn new(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            parameters: Vec::new(),
        }
    }

    pub fn with_parameters(mut self, parameters: Vec<StatementParameter>) -> Self {
        self.parameters = parameters;
        self
    }
}

/// Result of executing a statement
#[derive(Debug, Clone, PartialEq)]
pub struct SelectResult {
    /// Column metadata
    pub columns: Vec<ColumnInfo>,
    /// Result rows
    pub rows: Vec<Row>,
    /// Total row count
    pub row_count: usize,
    /// Execution time in milliseconds
    pub execution_time_ms: u128,
    /// The statement text that was executed
    pub original_query: String,
}

impl SelectResult {
    pub fn new(
        columns: Vec<ColumnInfo>,
        rows: Vec<Row>,
        execution_time_ms: u128,
        original_query: String,
    ) -> Self {
        let row_count = rows.len();
        Self {
            columns,
            rows,
            row_count,
            execution_time_ms,
            original_query,
        }
    }

    /// Index of the column called `name`.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    /// Display strings of one column, in row order.
    pub fn column_strings(&self, name: &str) -> Result<Vec<String>> {
        let idx = self
            .column_index(name)
            .ok_or_else(|| anyhow!("Result has no '{}' column", name))?;

        Ok(self
            .rows
            .iter()
            .filter_map(|row| row.get_value(idx))
            .map(|value| value.to_display_string())
            .collect())
    }

    /// Render as a table of display strings for the result grid.
    pub fn to_table_preview(&self) -> TablePreview {
        let headers = self.columns.iter().map(|c| c.name.clone()).collect();
        let rows = self
            .rows
            .iter()
            .map(|row| row.values().map(|v| v.to_display_string()).collect())
            .collect();
        TablePreview::new(headers, rows)
    }
}

/// Core trait for SQL warehouse clients.
///
/// Every call is self-contained: nothing is held open between statements.
///
/// # Example
///
/// ```ignore
/// use bucketdesk::services::warehouse::{Statement, WarehouseConfig, WarehouseFactory};
///
/// let config = WarehouseConfig::new("dbc-1234.cloud.databricks.com", "/sql/1.0/warehouses/abc", "dapi...");
/// let conn = WarehouseFactory::create(&config)?;
/// let result = conn.execute(&Statement::new("SELECT 1")).await?;
/// ```
#[async_trait]
pub trait WarehouseConnection: Send + Sync {
    /// Get the configuration this client was built from.
    fn warehouse_config(&self) -> &WarehouseConfig;

    /// Execute one statement and return its full result.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the service reports the
    /// statement as failed, canceled or still running.
    async fn execute(&self, statement: &Statement) -> Result<SelectResult>;

    /// Run a trivial statement to check credentials and warehouse access.
    async fn test_connection(&self) -> Result<()> {
        self.execute(&Statement::new("SELECT 1")).await?;
        Ok(())
    }
}

/// A boxed warehouse connection for dynamic dispatch.
pub type BoxedWarehouseConnection = Box<dyn WarehouseConnection>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::warehouse::row::Value;

    fn result() -> SelectResult {
        SelectResult::new(
            vec![
                ColumnInfo::new("database", "STRING", 0),
                ColumnInfo::new("tableName", "STRING", 1),
                ColumnInfo::new("isTemporary", "BOOLEAN", 2),
            ],
            vec![
                Row::from_values(vec!["default".into(), "orders".into(), Value::Bool(false)]),
                Row::from_values(vec!["default".into(), "users".into(), Value::Bool(false)]),
            ],
            12,
            "SHOW TABLES".to_string(),
        )
    }

    #[test]
    fn test_column_strings() {
        let result = result();
        assert_eq!(result.row_count, 2);
        assert_eq!(result.column_strings("tableName").unwrap(), vec!["orders", "users"]);
        assert!(result.column_strings("missing").is_err());
    }

    #[test]
    fn test_to_table_preview() {
        let table = result().to_table_preview();
        assert_eq!(table.headers, vec!["database", "tableName", "isTemporary"]);
        assert_eq!(table.rows[1], vec!["default", "users", "false"]);
    }

    #[test]
    fn test_null_parameter_omits_value() {
        let param = StatementParameter::new("c0", None, "STRING");
        let json = serde_json::to_value(&param).unwrap();
        assert_eq!(json, serde_json::json!({"name": "c0", "type": "STRING"}));

        let param = StatementParameter::new("c1", Some("O'Brien".into()), "STRING");
        let json = serde_json::to_value(&param).unwrap();
        assert_eq!(json["value"], "O'Brien");
    }
}
