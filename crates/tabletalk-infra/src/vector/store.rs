//! SQLite-backed vector index implementation.
//!
//! Implements `VectorIndex` from `tabletalk-core`. Embeddings are stored
//! as little-endian f32 blobs alongside the description, fingerprint,
//! and serialized schema they were computed from. Search decodes every
//! row and ranks by cosine similarity with a table-name tie-break, so
//! identical inputs always produce identical rankings.

use chrono::{DateTime, Utc};
use sqlx::Row;

use tabletalk_core::index::store::VectorIndex;
use tabletalk_types::error::IndexError;
use tabletalk_types::retrieval::{IndexUpsert, IndexedTable, SchemaHit};
use tabletalk_types::schema::TableSchema;

use crate::sqlite::pool::DatabasePool;

const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS schema_index (
    table_name  TEXT PRIMARY KEY,
    description TEXT NOT NULL,
    fingerprint TEXT NOT NULL,
    model       TEXT NOT NULL,
    dimension   INTEGER NOT NULL,
    embedding   BLOB NOT NULL,
    schema_json TEXT NOT NULL,
    updated_at  TEXT NOT NULL
);
"#;

/// SQLite-backed implementation of `VectorIndex`.
pub struct SqliteVectorIndex {
    pool: DatabasePool,
}

impl SqliteVectorIndex {
    /// Open the index over the given pool, creating its table if needed.
    pub async fn open(pool: DatabasePool) -> Result<Self, IndexError> {
        sqlx::raw_sql(SCHEMA_SQL)
            .execute(&pool.writer)
            .await
            .map_err(|e| IndexError::Storage(e.to_string()))?;
        Ok(Self { pool })
    }
}

// ---------------------------------------------------------------------------
// Embedding codec + similarity
// ---------------------------------------------------------------------------

/// Serialize an embedding as packed little-endian f32 bytes.
fn encode_embedding(embedding: &[f32]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(embedding.len() * 4);
    for value in embedding {
        bytes.extend_from_slice(&value.to_le_bytes());
    }
    bytes
}

/// Deserialize packed little-endian f32 bytes back into an embedding.
fn decode_embedding(bytes: &[u8]) -> Result<Vec<f32>, IndexError> {
    if bytes.len() % 4 != 0 {
        return Err(IndexError::Storage(format!(
            "corrupt embedding blob: {} bytes is not a multiple of 4",
            bytes.len()
        )));
    }
    Ok(bytes
        .chunks_exact(4)
        .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
        .collect())
}

/// Cosine similarity in f64 to keep small score differences stable
/// across platforms. Zero-norm vectors score 0.
fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    let mut dot = 0.0f64;
    let mut norm_a = 0.0f64;
    let mut norm_b = 0.0f64;
    for (x, y) in a.iter().zip(b.iter()) {
        dot += f64::from(*x) * f64::from(*y);
        norm_a += f64::from(*x) * f64::from(*x);
        norm_b += f64::from(*y) * f64::from(*y);
    }
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a.sqrt() * norm_b.sqrt())
}

// ---------------------------------------------------------------------------
// Private Row types for SQLite-to-domain mapping
// ---------------------------------------------------------------------------

struct EntryRow {
    table_name: String,
    description: String,
    model: String,
    dimension: i64,
    embedding: Vec<u8>,
    schema_json: String,
}

impl EntryRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            table_name: row.try_get("table_name")?,
            description: row.try_get("description")?,
            model: row.try_get("model")?,
            dimension: row.try_get("dimension")?,
            embedding: row.try_get("embedding")?,
            schema_json: row.try_get("schema_json")?,
        })
    }

    fn schema(&self) -> Result<TableSchema, IndexError> {
        serde_json::from_str(&self.schema_json).map_err(|e| {
            IndexError::Storage(format!(
                "corrupt schema for '{}': {e}",
                self.table_name
            ))
        })
    }
}

struct ListRow {
    table_name: String,
    description: String,
    fingerprint: String,
    model: String,
    dimension: i64,
    updated_at: String,
}

impl ListRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            table_name: row.try_get("table_name")?,
            description: row.try_get("description")?,
            fingerprint: row.try_get("fingerprint")?,
            model: row.try_get("model")?,
            dimension: row.try_get("dimension")?,
            updated_at: row.try_get("updated_at")?,
        })
    }

    fn into_entry(self) -> Result<IndexedTable, IndexError> {
        let updated_at = parse_datetime(&self.updated_at)?;
        Ok(IndexedTable {
            table: self.table_name,
            description: self.description,
            fingerprint: self.fingerprint,
            model: self.model,
            dimension: self.dimension as usize,
            updated_at,
        })
    }
}

fn parse_datetime(s: &str) -> Result<DateTime<Utc>, IndexError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| IndexError::Storage(format!("invalid datetime: {e}")))
}

impl VectorIndex for SqliteVectorIndex {
    async fn upsert(&self, record: &IndexUpsert, embedding: &[f32]) -> Result<(), IndexError> {
        let schema_json = serde_json::to_string(&record.schema)
            .map_err(|e| IndexError::Storage(format!("failed to serialize schema: {e}")))?;

        sqlx::query(
            r#"INSERT INTO schema_index
                   (table_name, description, fingerprint, model, dimension, embedding, schema_json, updated_at)
               VALUES (?, ?, ?, ?, ?, ?, ?, ?)
               ON CONFLICT (table_name) DO UPDATE SET
                   description = excluded.description,
                   fingerprint = excluded.fingerprint,
                   model = excluded.model,
                   dimension = excluded.dimension,
                   embedding = excluded.embedding,
                   schema_json = excluded.schema_json,
                   updated_at = excluded.updated_at"#,
        )
        .bind(&record.schema.name)
        .bind(&record.description)
        .bind(&record.fingerprint)
        .bind(&record.model)
        .bind(embedding.len() as i64)
        .bind(encode_embedding(embedding))
        .bind(&schema_json)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool.writer)
        .await
        .map_err(|e| IndexError::Storage(e.to_string()))?;

        Ok(())
    }

    async fn search(
        &self,
        query_embedding: &[f32],
        model: &str,
        limit: usize,
    ) -> Result<Vec<SchemaHit>, IndexError> {
        let rows = sqlx::query(
            "SELECT table_name, description, model, dimension, embedding, schema_json FROM schema_index",
        )
        .fetch_all(&self.pool.reader)
        .await
        .map_err(|e| IndexError::Storage(e.to_string()))?;

        let mut scored: Vec<(f64, String, SchemaHit)> = Vec::with_capacity(rows.len());
        for row in &rows {
            let entry = EntryRow::from_row(row).map_err(|e| IndexError::Storage(e.to_string()))?;

            if entry.model != model {
                return Err(IndexError::ModelMismatch {
                    indexed: entry.model,
                    query: model.to_string(),
                });
            }
            if entry.dimension as usize != query_embedding.len() {
                return Err(IndexError::DimensionMismatch {
                    expected: entry.dimension as usize,
                    actual: query_embedding.len(),
                });
            }

            let stored = decode_embedding(&entry.embedding)?;
            let score = cosine_similarity(query_embedding, &stored);
            let schema = entry.schema()?;
            scored.push((
                score,
                entry.table_name,
                SchemaHit {
                    schema,
                    description: entry.description,
                    score,
                },
            ));
        }

        // Highest score first; equal scores ordered by table name so the
        // ranking is reproducible.
        scored.sort_by(|a, b| {
            b.0.partial_cmp(&a.0)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.1.cmp(&b.1))
        });

        Ok(scored
            .into_iter()
            .take(limit)
            .map(|(_, _, hit)| hit)
            .collect())
    }

    async fn remove(&self, table: &str) -> Result<(), IndexError> {
        sqlx::query("DELETE FROM schema_index WHERE table_name = ?")
            .bind(table)
            .execute(&self.pool.writer)
            .await
            .map_err(|e| IndexError::Storage(e.to_string()))?;
        Ok(())
    }

    async fn list(&self) -> Result<Vec<IndexedTable>, IndexError> {
        let rows = sqlx::query(
            "SELECT table_name, description, fingerprint, model, dimension, updated_at FROM schema_index ORDER BY table_name",
        )
        .fetch_all(&self.pool.reader)
        .await
        .map_err(|e| IndexError::Storage(e.to_string()))?;

        let mut entries = Vec::with_capacity(rows.len());
        for row in &rows {
            let parsed = ListRow::from_row(row).map_err(|e| IndexError::Storage(e.to_string()))?;
            entries.push(parsed.into_entry()?);
        }
        Ok(entries)
    }

    async fn count(&self) -> Result<u64, IndexError> {
        let row = sqlx::query("SELECT COUNT(*) AS n FROM schema_index")
            .fetch_one(&self.pool.reader)
            .await
            .map_err(|e| IndexError::Storage(e.to_string()))?;
        let n: i64 = row
            .try_get("n")
            .map_err(|e| IndexError::Storage(e.to_string()))?;
        Ok(n as u64)
    }
}
