//! SchemaCatalog trait definition.
//!
//! Defines the interface for reading table metadata out of the local
//! database. Implementations live in tabletalk-infra (e.g.,
//! `SqliteCatalog`).

use tabletalk_types::error::CatalogError;
use tabletalk_types::schema::TableSchema;

/// Trait for extracting table metadata from the query database.
///
/// Uses RPITIT (native async fn in traits, Rust 2024 edition). Failures
/// here are fatal at startup: the pipeline cannot run against a database
/// it cannot introspect.
pub trait SchemaCatalog: Send + Sync {
    /// Extract metadata for every user table, sorted by table name.
    fn extract_all(
        &self,
    ) -> impl std::future::Future<Output = Result<Vec<TableSchema>, CatalogError>> + Send;

    /// Extract metadata for a single table.
    fn extract_table(
        &self,
        table: &str,
    ) -> impl std::future::Future<Output = Result<TableSchema, CatalogError>> + Send;
}
