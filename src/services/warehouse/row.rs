//! Result values, cells, rows and column metadata.

use serde::{Deserialize, Serialize};

/// A single value returned by the warehouse.
///
/// Values arrive as JSON strings and are typed using the column's type name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "type", content = "value")]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn to_display_string(&self) -> String {
        match self {
            Value::Null => "NULL".to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Int(v) => v.to_string(),
            Value::Float(v) => v.to_string(),
            Value::Text(s) => s.clone(),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Convert a raw JSON_ARRAY cell using the Databricks column type name.
    ///
    /// Unparseable values are kept as text rather than dropped.
    pub fn from_raw(raw: Option<&str>, type_name: &str) -> Value {
        let Some(raw) = raw else {
            return Value::Null;
        };

        match type_name.to_ascii_uppercase().as_str() {
            "BYTE" | "TINYINT" | "SHORT" | "SMALLINT" | "INT" | "INTEGER" | "LONG" | "BIGINT" => {
                raw.parse::<i64>()
                    .map(Value::Int)
                    .unwrap_or_else(|_| Value::Text(raw.to_string()))
            }
            "FLOAT" | "REAL" | "DOUBLE" => raw
                .parse::<f64>()
                .map(Value::Float)
                .unwrap_or_else(|_| Value::Text(raw.to_string())),
            "BOOLEAN" => match raw {
                "true" => Value::Bool(true),
                "false" => Value::Bool(false),
                _ => Value::Text(raw.to_string()),
            },
            // DECIMAL stays text to keep its precision
            _ => Value::Text(raw.to_string()),
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_display_string())
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

/// Metadata about a column in a query result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnInfo {
    pub name: String,
    /// Databricks type name, e.g. `STRING`, `BIGINT`
    pub type_name: String,
    /// Column position (0-indexed)
    pub ordinal: usize,
}

impl ColumnInfo {
    pub fn new(name: impl Into<String>, type_name: impl Into<String>, ordinal: usize) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            ordinal,
        }
    }
}

/// A cell in a query result row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    pub value: Value,
    pub column_index: usize,
}

impl Cell {
    pub fn new(value: Value, column_index: usize) -> Self {
        Self {
            value,
            column_index,
        }
    }

    pub fn to_display_string(&self) -> String {
        self.value.to_display_string()
    }
}

/// A row of cells from a query result
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Row {
    pub cells: Vec<Cell>,
}

impl Row {
    pub fn new(cells: Vec<Cell>) -> Self {
        Self { cells }
    }

    /// Create a row from values (auto-assigns column indices)
    pub fn from_values(values: Vec<Value>) -> Self {
        let cells = values
            .into_iter()
            .enumerate()
            .map(|(idx, value)| Cell::new(value, idx))
            .collect();
        Self { cells }
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn get_value(&self, index: usize) -> Option<&Value> {
        self.cells.get(index).map(|c| &c.value)
    }

    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.cells.iter().map(|c| &c.value)
    }
}
