//! Vector-index entries, retrieval hits, and refresh reporting.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::schema::TableSchema;

/// One table's entry in the persistent vector index, minus the vector
/// itself (which never leaves the store).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexedTable {
    pub table: String,
    pub description: String,
    /// SHA-256 hex digest of the description, for idempotent refresh.
    pub fingerprint: String,
    /// Embedding model that produced the stored vector.
    pub model: String,
    pub dimension: usize,
    pub updated_at: DateTime<Utc>,
}

/// Payload for writing one table into the vector index.
///
/// The embedding vector travels alongside this (not inside it) so the
/// payload stays cheap to clone into refresh reports and logs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexUpsert {
    pub schema: TableSchema,
    pub description: String,
    pub fingerprint: String,
    /// Embedding model that produced the accompanying vector.
    pub model: String,
}

/// A retrieval hit: the stored schema plus its similarity to the query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaHit {
    pub schema: TableSchema,
    pub description: String,
    /// Cosine similarity in [-1, 1]; higher is closer.
    pub score: f64,
}

/// Lean (table, score) pair for rendering which context was chosen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedTable {
    pub table: String,
    pub score: f64,
}

impl From<&SchemaHit> for RankedTable {
    fn from(hit: &SchemaHit) -> Self {
        RankedTable {
            table: hit.schema.name.clone(),
            score: hit.score,
        }
    }
}

/// A per-table indexing failure inside an otherwise successful refresh.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshFailure {
    pub table: String,
    pub reason: String,
}

/// What one index refresh sweep did.
///
/// Per-table failures land in `failed` instead of aborting the sweep;
/// tables whose fingerprints were unchanged land in `skipped`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RefreshReport {
    /// Tables embedded and upserted this sweep.
    pub indexed: Vec<String>,
    /// Tables whose descriptions were unchanged (no embedding call made).
    pub skipped: Vec<String>,
    /// Index entries deleted because the table no longer exists.
    pub removed: Vec<String>,
    pub failed: Vec<RefreshFailure>,
    pub elapsed_ms: u64,
}

impl RefreshReport {
    /// Number of tables currently represented by the index after the sweep.
    pub fn live_tables(&self) -> usize {
        self.indexed.len() + self.skipped.len()
    }

    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{ColumnInfo, TableSchema};

    #[test]
    fn test_ranked_table_from_hit() {
        let hit = SchemaHit {
            schema: TableSchema {
                name: "orders".to_string(),
                columns: vec![ColumnInfo {
                    name: "id".to_string(),
                    declared_type: "INTEGER".to_string(),
                    not_null: true,
                    primary_key: true,
                }],
                foreign_keys: vec![],
                row_count: 10,
                sample_rows: vec![],
            },
            description: "Table ORDERS contains 10 records".to_string(),
            score: 0.82,
        };
        let ranked = RankedTable::from(&hit);
        assert_eq!(ranked.table, "orders");
        assert!((ranked.score - 0.82).abs() < f64::EPSILON);
    }

    #[test]
    fn test_refresh_report_counters() {
        let report = RefreshReport {
            indexed: vec!["a".to_string()],
            skipped: vec!["b".to_string(), "c".to_string()],
            removed: vec!["gone".to_string()],
            failed: vec![RefreshFailure {
                table: "d".to_string(),
                reason: "rate limited".to_string(),
            }],
            elapsed_ms: 5,
        };
        assert_eq!(report.live_tables(), 3);
        assert!(!report.is_clean());
    }
}
