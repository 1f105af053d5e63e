//! Statement builders for the warehouse operations.
//!
//! Identifiers are backtick-quoted. Row values are never written into the SQL
//! text; they travel as named parameters.

use super::traits::{Statement, StatementParameter};

/// Quote one identifier, doubling embedded backticks.
pub fn quote_identifier(name: &str) -> String {
    format!("`{}`", name.replace('`', "``"))
}

/// Fully qualified, quoted reference to a table.
///
/// A dotted `table` is taken as already qualified and each part is quoted;
/// a bare name is placed in `catalog.schema`.
pub fn table_reference(catalog: &str, schema: &str, table: &str) -> String {
    let table = table.trim();
    if table.contains('.') {
        return table
            .split('.')
            .map(|part| quote_identifier(part.trim()))
            .collect::<Vec<_>>()
            .join(".");
    }

    format!(
        "{}.{}.{}",
        quote_identifier(catalog),
        quote_identifier(schema),
        quote_identifier(table)
    )
}

/// List the tables in a schema. The names are in the `tableName` column.
pub fn show_tables(catalog: &str, schema: &str) -> Statement {
    Statement::new(format!(
        "SHOW TABLES IN {}.{}",
        quote_identifier(catalog),
        quote_identifier(schema)
    ))
}

pub fn browse_table(catalog: &str, schema: &str, table: &str, limit: usize) -> Statement {
    Statement::new(format!(
        "SELECT * FROM {} LIMIT {}",
        table_reference(catalog, schema, table),
        limit
    ))
}

/// Parameter name for the cell in column `idx`.
pub fn parameter_name(idx: usize) -> String {
    format!("c{}", idx)
}

/// Bind a CSV cell as a typed parameter.
///
/// Empty cells become NULL. Integers bind as `BIGINT`, other finite numbers
/// as `DOUBLE`, `true`/`false` as `BOOLEAN` and everything else as the
/// unmodified string. Numbers written with a leading zero (`007`, `02134`)
/// are codes, not quantities, and stay strings.
pub fn infer_parameter(name: impl Into<String>, cell: &str) -> StatementParameter {
    if cell.is_empty() {
        return StatementParameter::new(name, None, "STRING");
    }

    let trimmed = cell.trim();

    if has_leading_zero(trimmed) {
        return StatementParameter::new(name, Some(cell.to_string()), "STRING");
    }

    if trimmed.parse::<i64>().is_ok() {
        return StatementParameter::new(name, Some(trimmed.to_string()), "BIGINT");
    }

    let looks_numeric = trimmed.chars().any(|c| c.is_ascii_digit());
    if looks_numeric && trimmed.parse::<f64>().is_ok_and(f64::is_finite) {
        return StatementParameter::new(name, Some(trimmed.to_string()), "DOUBLE");
    }

    if trimmed.eq_ignore_ascii_case("true") || trimmed.eq_ignore_ascii_case("false") {
        return StatementParameter::new(name, Some(trimmed.to_ascii_lowercase()), "BOOLEAN");
    }

    StatementParameter::new(name, Some(cell.to_string()), "STRING")
}

fn has_leading_zero(value: &str) -> bool {
    let digits = value.strip_prefix(['-', '+']).unwrap_or(value).as_bytes();
    matches!(digits, [b'0', next, ..] if next.is_ascii_digit())
}

/// One single-row insert with every cell bound as a parameter.
pub fn insert_row(table_ref: &str, cells: &[String]) -> Statement {
    let placeholders: Vec<String> = (0..cells.len())
        .map(|idx| format!(":{}", parameter_name(idx)))
        .collect();

    let parameters = cells
        .iter()
        .enumerate()
        .map(|(idx, cell)| infer_parameter(parameter_name(idx), cell))
        .collect();

    Statement::new(format!(
        "INSERT INTO {} VALUES ({})",
        table_ref,
        placeholders.join(", ")
    ))
    .with_parameters(parameters)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_identifier() {
        assert_eq!(quote_identifier("orders"), "`orders`");
        assert_eq!(quote_identifier("my table"), "`my table`");
        assert_eq!(quote_identifier("we`ird"), "`we``ird`");
    }

    #[test]
    fn test_table_reference() {
        assert_eq!(
            table_reference("main", "default", "orders"),
            "`main`.`default`.`orders`"
        );
        assert_eq!(
            table_reference("main", "default", "other.sales.orders"),
            "`other`.`sales`.`orders`"
        );
        assert_eq!(table_reference("main", "default", "raw.orders"), "`raw`.`orders`");
    }

    #[test]
    fn test_show_tables() {
        let statement = show_tables("main", "default");
        assert_eq!(statement.sql, "SHOW TABLES IN `main`.`default`");
        assert!(statement.parameters.is_empty());
    }

    #[test]
    fn test_browse_table() {
        let statement = browse_table("main", "default", "orders", 1000);
        assert_eq!(
            statement.sql,
            "SELECT * FROM `main`.`default`.`orders` LIMIT 1000"
        );
    }

    #[test]
    fn test_infer_parameter_types() {
        let p = infer_parameter("c0", "42");
        assert_eq!((p.type_name.as_str(), p.value.as_deref()), ("BIGINT", Some("42")));

        let p = infer_parameter("c0", "-1.5e3");
        assert_eq!((p.type_name.as_str(), p.value.as_deref()), ("DOUBLE", Some("-1.5e3")));

        let p = infer_parameter("c0", "TRUE");
        assert_eq!((p.type_name.as_str(), p.value.as_deref()), ("BOOLEAN", Some("true")));

        let p = infer_parameter("c0", "NaN");
        assert_eq!((p.type_name.as_str(), p.value.as_deref()), ("STRING", Some("NaN")));

        let p = infer_parameter("c0", "inf");
        assert_eq!(p.type_name, "STRING");

        let p = infer_parameter("c0", "");
        assert_eq!((p.type_name.as_str(), p.value), ("STRING", None));
    }

    #[test]
    fn test_leading_zero_numbers_stay_strings() {
        for cell in ["007", "02134", "-01", "00.5"] {
            let p = infer_parameter("c0", cell);
            assert_eq!((p.type_name.as_str(), p.value.as_deref()), ("STRING", Some(cell)));
        }

        for (cell, type_name) in [("0", "BIGINT"), ("0.5", "DOUBLE"), ("-0.25", "DOUBLE")] {
            assert_eq!(infer_parameter("c0", cell).type_name, type_name);
        }
    }

    #[test]
    fn test_insert_row_binds_every_cell() {
        let cells = vec![
            "1".to_string(),
            "O'Brien'); DROP TABLE t; --".to_string(),
            String::new(),
        ];
        let statement = insert_row("`main`.`default`.`people`", &cells);

        assert_eq!(
            statement.sql,
            "INSERT INTO `main`.`default`.`people` VALUES (:c0, :c1, :c2)"
        );
        assert!(!statement.sql.contains("O'Brien"));
        assert_eq!(statement.parameters.len(), 3);
        assert_eq!(
            statement.parameters[1].value.as_deref(),
            Some("O'Brien'); DROP TABLE t; --")
        );
        assert_eq!(statement.parameters[1].type_name, "STRING");
        assert_eq!(statement.parameters[2].value, None);
    }
}
