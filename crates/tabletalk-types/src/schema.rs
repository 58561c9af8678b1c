//! Table metadata types produced by schema extraction.
//!
//! A [`TableSchema`] is the unit the rest of the pipeline works with: the
//! description generator renders it to text, the indexer embeds that text,
//! and the prompt builder formats it into schema context blocks.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::value::SqlValue;

/// A single column as reported by the database catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnInfo {
    pub name: String,
    /// Declared type as written in the table definition (e.g., "INTEGER",
    /// "TEXT", "DECIMAL(10,2)"). May be empty for untyped columns.
    pub declared_type: String,
    pub not_null: bool,
    pub primary_key: bool,
}

/// A foreign-key edge from one column to a referenced table/column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForeignKey {
    pub column: String,
    pub references_table: String,
    pub references_column: String,
}

impl fmt::Display for ForeignKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} -> {}.{}",
            self.column, self.references_table, self.references_column
        )
    }
}

/// Extracted metadata for one table.
///
/// Produced by the schema extractor on each refresh; read-only until the
/// next refresh.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableSchema {
    pub name: String,
    /// Columns in catalog order.
    pub columns: Vec<ColumnInfo>,
    pub foreign_keys: Vec<ForeignKey>,
    pub row_count: i64,
    /// Up to a handful of sample rows, in column order.
    #[serde(default)]
    pub sample_rows: Vec<Vec<SqlValue>>,
}

impl TableSchema {
    /// Column names in catalog order.
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Primary-key column names in catalog order.
    pub fn primary_key(&self) -> Vec<&str> {
        self.columns
            .iter()
            .filter(|c| c.primary_key)
            .map(|c| c.name.as_str())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn customers_schema() -> TableSchema {
        TableSchema {
            name: "customers".to_string(),
            columns: vec![
                ColumnInfo {
                    name: "id".to_string(),
                    declared_type: "INTEGER".to_string(),
                    not_null: true,
                    primary_key: true,
                },
                ColumnInfo {
                    name: "name".to_string(),
                    declared_type: "TEXT".to_string(),
                    not_null: true,
                    primary_key: false,
                },
            ],
            foreign_keys: vec![],
            row_count: 2,
            sample_rows: vec![vec![
                SqlValue::Integer(1),
                SqlValue::Text("Alice".to_string()),
            ]],
        }
    }

    #[test]
    fn test_column_names_preserve_order() {
        let schema = customers_schema();
        assert_eq!(schema.column_names(), vec!["id", "name"]);
    }

    #[test]
    fn test_primary_key_filters_columns() {
        let schema = customers_schema();
        assert_eq!(schema.primary_key(), vec!["id"]);
    }

    #[test]
    fn test_foreign_key_display() {
        let fk = ForeignKey {
            column: "customer_id".to_string(),
            references_table: "customers".to_string(),
            references_column: "id".to_string(),
        };
        assert_eq!(fk.to_string(), "customer_id -> customers.id");
    }

    #[test]
    fn test_table_schema_serde_roundtrip() {
        let schema = customers_schema();
        let json = serde_json::to_string(&schema).unwrap();
        let parsed: TableSchema = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, schema);
    }
}
