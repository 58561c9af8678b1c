//! Dynamic row decoding for queries whose shape is not known at compile
//! time.
//!
//! Generated SQL and sample-row extraction both produce rows with
//! arbitrary columns, so values are decoded by their runtime storage
//! class instead of through typed `query_as` mappings.

use sqlx::sqlite::SqliteRow;
use sqlx::{Row, TypeInfo, ValueRef};

use tabletalk_types::value::SqlValue;

/// Decode one column of a row into an [`SqlValue`] based on the storage
/// class SQLite reports for the value itself (not the declared column
/// type).
pub fn decode_value(row: &SqliteRow, index: usize) -> Result<SqlValue, sqlx::Error> {
    let raw = row.try_get_raw(index)?;
    if raw.is_null() {
        return Ok(SqlValue::Null);
    }

    let value = match raw.type_info().name() {
        "INTEGER" | "BOOLEAN" => SqlValue::Integer(row.try_get::<i64, _>(index)?),
        "REAL" => SqlValue::Real(row.try_get::<f64, _>(index)?),
        "BLOB" => SqlValue::Blob(row.try_get::<Vec<u8>, _>(index)?),
        _ => SqlValue::Text(row.try_get::<String, _>(index)?),
    };
    Ok(value)
}

/// Decode every column of a row, in column order.
pub fn decode_row(row: &SqliteRow, width: usize) -> Result<Vec<SqlValue>, sqlx::Error> {
    let mut values = Vec::with_capacity(width);
    for index in 0..width {
        values.push(decode_value(row, index)?);
    }
    Ok(values)
}
