//! SQL warehouse access.
//!
//! A [`WarehouseSession`] holds the [`WarehouseConfig`] entered in the form
//! and builds a fresh [`DatabricksConnection`] for every operation. Row
//! uploads bind each cell as a statement parameter.

pub mod databricks;
pub mod factory;
pub mod row;
pub mod session;
pub mod sql;
pub mod traits;
pub mod types;
pub mod upload;

#[cfg(test)]
pub(crate) mod fake;

pub use databricks::DatabricksConnection;
pub use factory::WarehouseFactory;
pub use row::{Cell, ColumnInfo, Row, Value};
pub use session::WarehouseSession;
pub use traits::{
    BoxedWarehouseConnection, SelectResult, Statement, StatementParameter, WarehouseConnection,
};
pub use types::WarehouseConfig;
pub use upload::{RowUploadError, UploadReport};
