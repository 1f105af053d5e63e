//! Recording in-memory warehouse connection for tests.

use std::sync::Mutex;

use anyhow::{Result, anyhow};
use async_trait::async_trait;

use super::row::{ColumnInfo, Row};
use super::traits::{SelectResult, Statement, WarehouseConnection};
use super::types::WarehouseConfig;

/// Records every executed statement and answers with a canned result.
///
/// `fail_at` makes the n-th call (0-indexed) fail; statements that fail are
/// recorded as attempted but not as committed.
pub struct RecordingWarehouse {
    config: WarehouseConfig,
    result: SelectResult,
    fail_at: Option<usize>,
    attempted: Mutex<Vec<Statement>>,
    committed: Mutex<Vec<Statement>>,
}

impl RecordingWarehouse {
    pub fn new() -> Self {
        Self {
            config: WarehouseConfig::new(
                "dbc-1234.cloud.databricks.com",
                "/sql/1.0/warehouses/abc123",
                "dapi-secret",
            ),
            result: SelectResult::new(vec![], vec![], 0, String::new()),
            fail_at: None,
            attempted: Mutex::new(Vec::new()),
            committed: Mutex::new(Vec::new()),
        }
    }

    pub fn with_result(mut self, columns: Vec<ColumnInfo>, rows: Vec<Row>) -> Self {
        self.result = SelectResult::new(columns, rows, 1, String::new());
        self
    }

    pub fn failing_at(mut self, call: usize) -> Self {
        self.fail_at = Some(call);
        self
    }

    pub fn attempted(&self) -> Vec<Statement> {
        self.attempted.lock().unwrap().clone()
    }

    pub fn committed(&self) -> Vec<Statement> {
        self.committed.lock().unwrap().clone()
    }
}

#[async_trait]
impl WarehouseConnection for RecordingWarehouse {
    fn warehouse_config(&self) -> &WarehouseConfig {
        &self.config
    }

    async fn execute(&self, statement: &Statement) -> Result<SelectResult> {
        let call = {
            let mut attempted = self.attempted.lock().unwrap();
            attempted.push(statement.clone());
            attempted.len() - 1
        };

        if self.fail_at == Some(call) {
            return Err(anyhow!("Statement failed: [DELTA_INSERT_COLUMN_ARITY_MISMATCH]"));
        }

        self.committed.lock().unwrap().push(statement.clone());

        let mut result = self.result.clone();
        result.original_query = statement.sql.clone();
        Ok(result)
    }
}
