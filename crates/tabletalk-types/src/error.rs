use thiserror::Error;

/// Errors from schema catalog extraction.
///
/// These are fatal at startup: a database we cannot introspect is a
/// database we cannot answer questions about.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("database connection error")]
    Connection,

    #[error("catalog query failed: {0}")]
    Extraction(String),

    #[error("table not found: '{0}'")]
    TableNotFound(String),
}

/// Errors from LLM and embedding provider operations.
///
/// All variants abort the current request only; nothing here is retried
/// automatically.
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("provider error: {message}")]
    Provider { message: String },

    #[error("network error: {0}")]
    Network(String),

    #[error("deserialization error: {0}")]
    Deserialization(String),

    #[error("rate limited (retry after {retry_after_ms:?}ms)")]
    RateLimited { retry_after_ms: Option<u64> },

    #[error("provider overloaded: {0}")]
    Overloaded(String),

    #[error("authentication failed")]
    AuthenticationFailed,

    #[error("request refused by provider: {0}")]
    Refused(String),

    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

/// Errors from executing generated SQL against the local database.
///
/// Kept distinct from [`LlmError`]: a statement the database rejects is a
/// different failure from a provider we could not reach.
#[derive(Debug, Error)]
pub enum QueryError {
    #[error("the generated query could not run: {0}")]
    ExecutionFailed(String),

    #[error("statement rejected: {0}")]
    RejectedStatement(String),

    #[error("provider returned no usable SQL")]
    EmptyStatement,
}

/// Errors from the persistent vector index.
#[derive(Debug, Error)]
pub enum IndexError {
    #[error("index storage error: {0}")]
    Storage(String),

    #[error("embedding dimension mismatch: index has {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("embedding model mismatch: index built with '{indexed}', query used '{query}'")]
    ModelMismatch { indexed: String, query: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_error_display() {
        let err = CatalogError::Extraction("no such table: sqlite_master".to_string());
        assert_eq!(
            err.to_string(),
            "catalog query failed: no such table: sqlite_master"
        );
    }

    #[test]
    fn test_query_error_display() {
        let err = QueryError::ExecutionFailed("near \"SELCT\": syntax error".to_string());
        assert!(err.to_string().starts_with("the generated query could not run"));
    }

    #[test]
    fn test_execution_error_distinct_from_network_error() {
        let exec = QueryError::ExecutionFailed("syntax error".to_string());
        let net = LlmError::Network("connection refused".to_string());
        assert_ne!(exec.to_string(), net.to_string());
        assert!(exec.to_string().contains("query"));
        assert!(net.to_string().contains("network"));
    }

    #[test]
    fn test_index_error_display() {
        let err = IndexError::ModelMismatch {
            indexed: "text-embedding-004".to_string(),
            query: "text-embedding-005".to_string(),
        };
        assert!(err.to_string().contains("text-embedding-004"));
        assert!(err.to_string().contains("text-embedding-005"));
    }
}
