//! Databricks SQL warehouse connection.
//!
//! Statements go through the SQL Statement Execution API
//! (`POST /api/2.0/sql/statements`) with inline JSON_ARRAY results. Each
//! statement is one synchronous request: the service waits up to
//! [`WAIT_TIMEOUT`] and cancels the statement if it has not finished.
//! Result chunks past the first are fetched from their internal links.

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use super::row::{Cell, ColumnInfo, Row, Value};
use super::traits::{
    BoxedWarehouseConnection, SelectResult, Statement, StatementParameter, WarehouseConnection,
};
use super::types::WarehouseConfig;

/// How long the service holds the request open before canceling.
pub const WAIT_TIMEOUT: &str = "50s";

const STATEMENTS_PATH: &str = "/api/2.0/sql/statements";

/// Databricks SQL warehouse connection.
///
/// Holds only the configuration; no session is kept between statements.
pub struct DatabricksConnection {
    config: WarehouseConfig,
}

impl std::fmt::Debug for DatabricksConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabricksConnection")
            .field("config", &self.config)
            .finish()
    }
}

#[derive(Debug, Serialize)]
struct StatementRequest<'a> {
    warehouse_id: &'a str,
    statement: &'a str,
    #[serde(skip_serializing_if = "<[_]>::is_empty")]
    parameters: &'a [StatementParameter],
    catalog: &'a str,
    schema: &'a str,
    wait_timeout: &'static str,
    on_wait_timeout: &'static str,
    disposition: &'static str,
    format: &'static str,
}

#[derive(Debug, Deserialize)]
struct StatementResponse {
    status: Option<StatementStatus>,
    manifest: Option<ResultManifest>,
    result: Option<ResultChunk>,
}

#[derive(Debug, Deserialize)]
struct StatementStatus {
    state: String,
    error: Option<ServiceError>,
}

#[derive(Debug, Deserialize)]
struct ServiceError {
    error_code: Option<String>,
    message: Option<String>,
}

impl ServiceError {
    fn describe(&self) -> String {
        match (&self.error_code, &self.message) {
            (_, Some(message)) => message.clone(),
            (Some(code), None) => code.clone(),
            (None, None) => "unknown error".to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ResultManifest {
    schema: Option<ResultSchema>,
}

#[derive(Debug, Deserialize)]
struct ResultSchema {
    #[serde(default)]
    columns: Vec<ColumnManifest>,
}

#[derive(Debug, Deserialize)]
struct ColumnManifest {
    name: String,
    type_name: Option<String>,
    position: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
struct ResultChunk {
    #[serde(default)]
    data_array: Vec<Vec<JsonValue>>,
    next_chunk_internal_link: Option<String>,
}

/// First page of a statement result.
#[derive(Debug)]
struct ParsedStatement {
    columns: Vec<ColumnInfo>,
    chunk: ResultChunk,
}

impl DatabricksConnection {
    pub fn new(config: WarehouseConfig) -> Self {
        Self { config }
    }

    /// Create a boxed connection (for factory use).
    pub fn boxed(config: WarehouseConfig) -> BoxedWarehouseConnection {
        Box::new(Self::new(config))
    }

    fn statements_url(&self) -> String {
        format!("{}{}", self.config.base_url(), STATEMENTS_PATH)
    }

    fn auth_header(&self) -> (String, String) {
        (
            "Authorization".to_string(),
            format!("Bearer {}", self.config.access_token),
        )
    }

    /// Serialize the request body for a statement.
    fn request_body(&self, statement: &Statement) -> Result<String> {
        let warehouse_id = self
            .config
            .warehouse_id()
            .ok_or_else(|| anyhow!("HTTP path does not name a warehouse"))?;

        let request = StatementRequest {
            warehouse_id,
            statement: &statement.sql,
            parameters: &statement.parameters,
            catalog: &self.config.catalog,
            schema: &self.config.schema,
            wait_timeout: WAIT_TIMEOUT,
            on_wait_timeout: "CANCEL",
            disposition: "INLINE",
            format: "JSON_ARRAY",
        };

        Ok(serde_json::to_string(&request)?)
    }

    async fn post_json(&self, url: String, body: String) -> Result<String> {
        let auth_header = self.auth_header();

        // Use smol::unblock for sync HTTP client
        smol::unblock(move || {
            let response = smolhttp::Client::new(&url)
                .map_err(|e| anyhow!("Failed to create HTTP client: {}", e))?
                .post()
                .headers(vec![
                    auth_header,
                    ("Content-Type".to_string(), "application/json".to_string()),
                ])
                .body(body.into_bytes())
                .send()
                .map_err(|e| anyhow!("HTTP request failed: {}", e))?;

            Ok::<String, anyhow::Error>(response.text())
        })
        .await
    }

    async fn get(&self, url: String) -> Result<String> {
        let auth_header = self.auth_header();

        smol::unblock(move || {
            let response = smolhttp::Client::new(&url)
                .map_err(|e| anyhow!("Failed to create HTTP client: {}", e))?
                .get()
                .headers(vec![auth_header])
                .send()
                .map_err(|e| anyhow!("HTTP request failed: {}", e))?;

            Ok::<String, anyhow::Error>(response.text())
        })
        .await
    }
}

/// Parse a response body, failing on a top-level `error_code`/`message`.
fn parse_body(body: &str) -> Result<JsonValue> {
    let json: JsonValue = serde_json::from_str(body)
        .map_err(|e| anyhow!("Failed to parse response: {}: {}", e, body.trim()))?;

    if json.get("error_code").is_some() || json.get("message").is_some() {
        let error: ServiceError = serde_json::from_value(json)?;
        return Err(anyhow!("Databricks error: {}", error.describe()));
    }

    Ok(json)
}

fn parse_statement_response(body: &str) -> Result<ParsedStatement> {
    let response: StatementResponse = serde_json::from_value(parse_body(body)?)?;

    let status = response
        .status
        .ok_or_else(|| anyhow!("Response has no statement status"))?;

    match status.state.as_str() {
        "SUCCEEDED" => {}
        "PENDING" | "RUNNING" => {
            return Err(anyhow!(
                "Statement did not finish within {}",
                WAIT_TIMEOUT
            ));
        }
        state => {
            let detail = status
                .error
                .map(|e| e.describe())
                .unwrap_or_else(|| "no error detail".to_string());
            return Err(anyhow!("Statement {}: {}", state.to_lowercase(), detail));
        }
    }

    let mut manifest_columns = response
        .manifest
        .and_then(|m| m.schema)
        .map(|s| s.columns)
        .unwrap_or_default();
    manifest_columns.sort_by_key(|c| c.position);

    let columns = manifest_columns
        .into_iter()
        .enumerate()
        .map(|(idx, c)| ColumnInfo::new(c.name, c.type_name.unwrap_or_default(), idx))
        .collect();

    Ok(ParsedStatement {
        columns,
        chunk: response.result.unwrap_or_default(),
    })
}

fn parse_chunk_response(body: &str) -> Result<ResultChunk> {
    Ok(serde_json::from_value(parse_body(body)?)?)
}

/// Convert JSON_ARRAY rows using the column type names.
fn convert_rows(columns: &[ColumnInfo], data: Vec<Vec<JsonValue>>) -> Vec<Row> {
    data.into_iter()
        .map(|raw_row| {
            let cells = raw_row
                .into_iter()
                .enumerate()
                .map(|(idx, raw)| {
                    let type_name = columns
                        .get(idx)
                        .map(|c| c.type_name.as_str())
                        .unwrap_or("STRING");
                    let value = match raw {
                        JsonValue::Null => Value::Null,
                        JsonValue::String(s) => Value::from_raw(Some(&s), type_name),
                        other => Value::from_raw(Some(&other.to_string()), type_name),
                    };
                    Cell::new(value, idx)
                })
                .collect();
            Row::new(cells)
        })
        .collect()
}

#[async_trait]
impl WarehouseConnection for DatabricksConnection {
    fn warehouse_config(&self) -> &WarehouseConfig {
        &self.config
    }

    async fn execute(&self, statement: &Statement) -> Result<SelectResult> {
        let start_time = std::time::Instant::now();
        let body = self.request_body(statement)?;

        tracing::debug!(
            "Executing on {} with {} parameters: {}",
            self.config.host(),
            statement.parameters.len(),
            statement.sql
        );

        let response = self.post_json(self.statements_url(), body).await?;
        let ParsedStatement { columns, chunk } = parse_statement_response(&response)?;

        let mut data = chunk.data_array;
        let mut next_link = chunk.next_chunk_internal_link;
        while let Some(link) = next_link {
            let url = format!("{}{}", self.config.base_url(), link);
            let chunk = parse_chunk_response(&self.get(url).await?)?;
            data.extend(chunk.data_array);
            next_link = chunk.next_chunk_internal_link;
        }

        let rows = convert_rows(&columns, data);
        let execution_time_ms = start_time.elapsed().as_millis();

        Ok(SelectResult::new(
            columns,
            rows,
            execution_time_ms,
            statement.sql.clone(),
        ))
    }
}
