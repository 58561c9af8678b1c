//! QueryExecutor trait definition.
//!
//! Defines the read path for generated SQL. Implementations live in
//! tabletalk-infra (e.g., `SqliteQueryExecutor` over a read-only pool).

use tabletalk_types::error::QueryError;
use tabletalk_types::value::ResultSet;

/// Trait for executing one generated SQL statement against the local
/// database.
///
/// Uses RPITIT (native async fn in traits, Rust 2024 edition).
/// Implementations must not assume the SQL is valid: generated statements
/// fail routinely, and those failures surface as
/// [`QueryError::ExecutionFailed`] -- never as a transport error.
pub trait QueryExecutor: Send + Sync {
    fn execute(
        &self,
        sql: &str,
    ) -> impl std::future::Future<Output = Result<ResultSet, QueryError>> + Send;
}
