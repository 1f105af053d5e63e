//! Row upload into an existing warehouse table.
//!
//! One parameter-bound `INSERT` per row, executed in order without a
//! transaction. The first failing row stops the upload; rows before it stay
//! committed.

use anyhow::Result;
use thiserror::Error;

use super::sql;
use super::traits::WarehouseConnection;
use crate::services::preview::{TablePreview, UPLOAD_ENCODINGS, read_csv};

/// Outcome of a finished upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadReport {
    /// Quoted table reference the rows went into
    pub table: String,
    pub rows_inserted: usize,
}

/// A row insert failed; earlier rows are already committed.
#[derive(Debug, Error)]
#[error("Row {row} could not be inserted ({inserted} rows were inserted before it): {source}")]
pub struct RowUploadError {
    /// 1-based number of the failing data row
    pub row: usize,
    pub inserted: usize,
    pub source: anyhow::Error,
}

/// Insert every row of `table_data` into `table`.
pub async fn upload_rows(
    conn: &dyn WarehouseConnection,
    table: &str,
    table_data: &TablePreview,
) -> Result<UploadReport, RowUploadError> {
    let config = conn.warehouse_config();
    let table_ref = sql::table_reference(&config.catalog, &config.schema, table);

    for (idx, cells) in table_data.rows.iter().enumerate() {
        let statement = sql::insert_row(&table_ref, cells);
        if let Err(source) = conn.execute(&statement).await {
            tracing::error!("Upload into {} stopped at row {}: {}", table_ref, idx + 1, source);
            return Err(RowUploadError {
                row: idx + 1,
                inserted: idx,
                source,
            });
        }
    }

    tracing::info!("Inserted {} rows into {}", table_data.row_count(), table_ref);
    Ok(UploadReport {
        table: table_ref,
        rows_inserted: table_data.row_count(),
    })
}

/// Decode CSV bytes with the upload encodings and insert the rows.
///
/// Decode failures surface as [`PreviewError`](crate::services::preview::PreviewError),
/// row failures as [`RowUploadError`]; both can be recovered with
/// `anyhow::Error::downcast_ref`.
pub async fn upload_csv(
    conn: &dyn WarehouseConnection,
    table: &str,
    content: &[u8],
) -> Result<UploadReport> {
    let decoded = read_csv(content, UPLOAD_ENCODINGS)?;
    tracing::debug!(
        "Decoded {} rows as {} for upload",
        decoded.table.row_count(),
        decoded.encoding.label()
    );
    Ok(upload_rows(conn, table, &decoded.table).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::preview::PreviewError;
    use crate::services::warehouse::fake::RecordingWarehouse;

    fn table(rows: &[&[&str]]) -> TablePreview {
        TablePreview::new(
            vec!["id".to_string(), "name".to_string()],
            rows.iter()
                .map(|r| r.iter().map(|c| c.to_string()).collect())
                .collect(),
        )
    }

    #[test]
    fn test_upload_all_rows() {
        let conn = RecordingWarehouse::new();
        let data = table(&[&["1", "a"], &["2", "b"]]);

        let report = smol::block_on(upload_rows(&conn, "people", &data)).unwrap();
        assert_eq!(report.rows_inserted, 2);
        assert_eq!(report.table, "`main`.`default`.`people`");

        let committed = conn.committed();
        assert_eq!(committed.len(), 2);
        assert_eq!(
            committed[0].sql,
            "INSERT INTO `main`.`default`.`people` VALUES (:c0, :c1)"
        );
        assert_eq!(committed[1].parameters[1].value.as_deref(), Some("b"));
    }

    #[test]
    fn test_upload_stops_at_failing_row() {
        // Third row (call index 2) fails
        let conn = RecordingWarehouse::new().failing_at(2);
        let data = table(&[&["1", "a"], &["2", "b"], &["3", "c"], &["4", "d"], &["5", "e"]]);

        let err = smol::block_on(upload_rows(&conn, "people", &data)).unwrap_err();
        assert_eq!(err.row, 3);
        assert_eq!(err.inserted, 2);
        assert!(err.to_string().contains("Row 3"));

        // Rows 1-2 persisted, row 3 attempted, rows 4-5 never attempted
        assert_eq!(conn.committed().len(), 2);
        assert_eq!(conn.attempted().len(), 3);
    }

    #[test]
    fn test_upload_quote_stays_parameter() {
        let conn = RecordingWarehouse::new();
        let data = table(&[&["1", "O'Brien"]]);

        smol::block_on(upload_rows(&conn, "people", &data)).unwrap();
        let statement = &conn.committed()[0];
        assert!(!statement.sql.contains("O'Brien"));
        assert_eq!(statement.parameters[1].value.as_deref(), Some("O'Brien"));
    }

    #[test]
    fn test_upload_no_rows() {
        let conn = RecordingWarehouse::new();
        let report = smol::block_on(upload_rows(&conn, "people", &table(&[]))).unwrap();
        assert_eq!(report.rows_inserted, 0);
        assert!(conn.attempted().is_empty());
    }

    #[test]
    fn test_upload_csv_latin1() {
        let conn = RecordingWarehouse::new();
        let content = b"id,name\n1,Jos\xe9\n";

        let report = smol::block_on(upload_csv(&conn, "people", content)).unwrap();
        assert_eq!(report.rows_inserted, 1);
        assert_eq!(
            conn.committed()[0].parameters[1].value.as_deref(),
            Some("José")
        );
    }

    #[test]
    fn test_upload_csv_empty_file() {
        let conn = RecordingWarehouse::new();
        let err = smol::block_on(upload_csv(&conn, "people", b"  \n")).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<PreviewError>(),
            Some(PreviewError::EmptyFile)
        ));
        assert!(conn.attempted().is_empty());
    }

    #[test]
    fn test_upload_csv_row_failure_downcasts() {
        let conn = RecordingWarehouse::new().failing_at(0);
        let err = smol::block_on(upload_csv(&conn, "people", b"id\n1\n")).unwrap_err();
        let row_error = err.downcast_ref::<RowUploadError>().unwrap();
        assert_eq!(row_error.row, 1);
        assert_eq!(row_error.inserted, 0);
    }
}
