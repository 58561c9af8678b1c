//! Vector index trait.
//!
//! Defines the interface for the persistent table-schema vector index.
//! Implementations (e.g., the SQLite-backed store) live in
//! tabletalk-infra.

use tabletalk_types::error::IndexError;
use tabletalk_types::retrieval::{IndexUpsert, IndexedTable, SchemaHit};

/// Trait for persistent vector storage keyed by table name.
///
/// Uses RPITIT (native async fn in traits, Rust 2024 edition).
/// One entry per table; upserting an existing table replaces its vector,
/// description, and fingerprint in place.
pub trait VectorIndex: Send + Sync {
    /// Insert or replace the entry for `record.schema.name`.
    fn upsert(
        &self,
        record: &IndexUpsert,
        embedding: &[f32],
    ) -> impl std::future::Future<Output = Result<(), IndexError>> + Send;

    /// Nearest-neighbor search by cosine similarity, best first, ties
    /// broken by table name for deterministic ranking.
    ///
    /// `model` is the embedding model that produced `query_embedding`;
    /// entries indexed under a different model are a
    /// [`IndexError::ModelMismatch`], not silently incomparable results.
    /// An empty index returns an empty vec, never an error.
    fn search(
        &self,
        query_embedding: &[f32],
        model: &str,
        limit: usize,
    ) -> impl std::future::Future<Output = Result<Vec<SchemaHit>, IndexError>> + Send;

    /// Delete the entry for a table. Deleting a missing table is a no-op.
    fn remove(
        &self,
        table: &str,
    ) -> impl std::future::Future<Output = Result<(), IndexError>> + Send;

    /// All entries (without vectors), sorted by table name.
    fn list(
        &self,
    ) -> impl std::future::Future<Output = Result<Vec<IndexedTable>, IndexError>> + Send;

    /// Number of indexed tables.
    fn count(&self) -> impl std::future::Future<Output = Result<u64, IndexError>> + Send;
}
