//! SQLite schema catalog implementation.
//!
//! Implements `SchemaCatalog` from `tabletalk-core` by reading
//! `sqlite_master` and the `table_info` / `foreign_key_list` pragmas,
//! plus a row count and a few sample rows per table.

use sqlx::Row;

use tabletalk_core::schema::catalog::SchemaCatalog;
use tabletalk_types::error::CatalogError;
use tabletalk_types::schema::{ColumnInfo, ForeignKey, TableSchema};
use tabletalk_types::value::SqlValue;

use super::pool::DatabasePool;
use super::row::decode_row;

/// How many sample rows to keep per table.
const SAMPLE_LIMIT: u32 = 3;

/// SQLite-backed implementation of `SchemaCatalog`.
///
/// Only needs the reader half of the pool; extraction never writes.
pub struct SqliteCatalog {
    pool: DatabasePool,
}

impl SqliteCatalog {
    /// Create a new catalog over the given target database pool.
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }

    async fn table_names(&self) -> Result<Vec<String>, CatalogError> {
        let rows = sqlx::query(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name",
        )
        .fetch_all(&self.pool.reader)
        .await
        .map_err(|e| CatalogError::Extraction(e.to_string()))?;

        let mut names = Vec::with_capacity(rows.len());
        for row in &rows {
            let name: String = row
                .try_get("name")
                .map_err(|e| CatalogError::Extraction(e.to_string()))?;
            names.push(name);
        }
        Ok(names)
    }

    async fn columns(&self, table: &str) -> Result<Vec<ColumnInfo>, CatalogError> {
        // PRAGMA arguments cannot be bound, so the identifier is quoted
        // inline. Names come from sqlite_master, but escape anyway.
        let rows = sqlx::query(&format!("PRAGMA table_info({})", quote_ident(table)))
            .fetch_all(&self.pool.reader)
            .await
            .map_err(|e| CatalogError::Extraction(e.to_string()))?;

        let mut columns = Vec::with_capacity(rows.len());
        for row in &rows {
            let parsed = ColumnRow::from_row(row)
                .map_err(|e| CatalogError::Extraction(e.to_string()))?;
            columns.push(parsed.into_column());
        }
        Ok(columns)
    }

    async fn foreign_keys(&self, table: &str) -> Result<Vec<ForeignKey>, CatalogError> {
        let rows = sqlx::query(&format!("PRAGMA foreign_key_list({})", quote_ident(table)))
            .fetch_all(&self.pool.reader)
            .await
            .map_err(|e| CatalogError::Extraction(e.to_string()))?;

        let mut fks = Vec::with_capacity(rows.len());
        for row in &rows {
            let parsed = ForeignKeyRow::from_row(row)
                .map_err(|e| CatalogError::Extraction(e.to_string()))?;
            fks.push(parsed.into_foreign_key());
        }
        Ok(fks)
    }

    async fn row_count(&self, table: &str) -> Result<i64, CatalogError> {
        let row = sqlx::query(&format!(
            "SELECT COUNT(*) AS n FROM {}",
            quote_ident(table)
        ))
        .fetch_one(&self.pool.reader)
        .await
        .map_err(|e| CatalogError::Extraction(e.to_string()))?;

        row.try_get("n")
            .map_err(|e| CatalogError::Extraction(e.to_string()))
    }

    async fn sample_rows(
        &self,
        table: &str,
        width: usize,
    ) -> Result<Vec<Vec<SqlValue>>, CatalogError> {
        let rows = sqlx::query(&format!(
            "SELECT * FROM {} LIMIT {SAMPLE_LIMIT}",
            quote_ident(table)
        ))
        .fetch_all(&self.pool.reader)
        .await
        .map_err(|e| CatalogError::Extraction(e.to_string()))?;

        let mut samples = Vec::with_capacity(rows.len());
        for row in &rows {
            samples.push(
                decode_row(row, width).map_err(|e| CatalogError::Extraction(e.to_string()))?,
            );
        }
        Ok(samples)
    }
}

// ---------------------------------------------------------------------------
// Private Row types for pragma-to-domain mapping
// ---------------------------------------------------------------------------

struct ColumnRow {
    name: String,
    declared_type: String,
    not_null: i64,
    pk: i64,
}

impl ColumnRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            name: row.try_get("name")?,
            declared_type: row.try_get("type")?,
            not_null: row.try_get("notnull")?,
            pk: row.try_get("pk")?,
        })
    }

    fn into_column(self) -> ColumnInfo {
        ColumnInfo {
            name: self.name,
            declared_type: self.declared_type,
            not_null: self.not_null != 0,
            // `pk` is the 1-based position within the primary key, or 0
            // for non-key columns.
            primary_key: self.pk > 0,
        }
    }
}

struct ForeignKeyRow {
    from: String,
    table: String,
    to: Option<String>,
}

impl ForeignKeyRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            from: row.try_get("from")?,
            table: row.try_get("table")?,
            // `to` is NULL when the reference targets the parent's
            // implicit primary key.
            to: row.try_get("to")?,
        })
    }

    fn into_foreign_key(self) -> ForeignKey {
        ForeignKey {
            column: self.from,
            references_table: self.table,
            references_column: self.to.unwrap_or_else(|| "id".to_string()),
        }
    }
}

/// Double-quote an identifier for inline use, escaping embedded quotes.
fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

impl SchemaCatalog for SqliteCatalog {
    async fn extract_all(&self) -> Result<Vec<TableSchema>, CatalogError> {
        let names = self.table_names().await?;
        let mut schemas = Vec::with_capacity(names.len());
        for name in &names {
            schemas.push(self.extract_table(name).await?);
        }
        Ok(schemas)
    }

    async fn extract_table(&self, table: &str) -> Result<TableSchema, CatalogError> {
        let columns = self.columns(table).await?;
        if columns.is_empty() {
            return Err(CatalogError::TableNotFound(table.to_string()));
        }

        let foreign_keys = self.foreign_keys(table).await?;
        let row_count = self.row_count(table).await?;
        let sample_rows = self.sample_rows(table, columns.len()).await?;

        Ok(TableSchema {
            name: table.to_string(),
            columns,
            foreign_keys,
            row_count,
            sample_rows,
        })
    }
}
