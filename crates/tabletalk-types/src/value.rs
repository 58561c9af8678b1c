//! Dynamically-typed SQL values and result sets.
//!
//! Generated SQL is arbitrary, so execution results cannot be mapped onto
//! static row structs. [`SqlValue`] mirrors SQLite's storage classes and
//! [`ResultSet`] carries whatever came back.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One cell of a query result, covering SQLite's five storage classes.
///
/// Serializes to natural JSON: `null`, numbers, strings, and byte arrays.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SqlValue {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Blob(Vec<u8>),
}

impl SqlValue {
    /// Numeric view for statistics; `None` for non-numeric values.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            SqlValue::Integer(i) => Some(*i as f64),
            SqlValue::Real(r) => Some(*r),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, SqlValue::Null)
    }
}

impl fmt::Display for SqlValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SqlValue::Null => write!(f, "NULL"),
            SqlValue::Integer(i) => write!(f, "{i}"),
            SqlValue::Real(r) => write!(f, "{r}"),
            SqlValue::Text(s) => write!(f, "{s}"),
            SqlValue::Blob(b) => write!(f, "<blob {} bytes>", b.len()),
        }
    }
}

/// Columns and rows returned by executing one SQL statement.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultSet {
    /// Column names in select order.
    pub columns: Vec<String>,
    /// Rows in result order, each cell matching `columns` by position.
    pub rows: Vec<Vec<SqlValue>>,
}

impl ResultSet {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Values of the named column across all rows, if the column exists.
    pub fn column_values(&self, name: &str) -> Option<Vec<&SqlValue>> {
        let idx = self.columns.iter().position(|c| c == name)?;
        Some(self.rows.iter().filter_map(|r| r.get(idx)).collect())
    }
}
