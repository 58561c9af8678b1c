//! Read-only execution of generated SQL.
//!
//! Implements `QueryExecutor` from `tabletalk-core`. Statements pass
//! keyword validation first, then run on a read-only connection, so
//! both layers must fail for a write to reach the database file.

use sqlx::{Column, Executor, Statement};

use tabletalk_core::query::executor::QueryExecutor;
use tabletalk_core::query::sanitize;
use tabletalk_types::error::QueryError;
use tabletalk_types::value::ResultSet;

use super::pool::DatabasePool;
use super::row::decode_row;

/// SQLite-backed implementation of `QueryExecutor`.
pub struct SqliteQueryExecutor {
    pool: DatabasePool,
}

impl SqliteQueryExecutor {
    /// Create a new executor over the given target database pool.
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

impl QueryExecutor for SqliteQueryExecutor {
    async fn execute(&self, sql: &str) -> Result<ResultSet, QueryError> {
        sanitize::ensure_read_only(sql)?;

        // Prepare first so column names survive even when the result is
        // empty; fetch_all alone loses them for zero-row results.
        let statement = self
            .pool
            .reader
            .prepare(sql)
            .await
            .map_err(|e| QueryError::ExecutionFailed(e.to_string()))?;

        let columns: Vec<String> = statement
            .columns()
            .iter()
            .map(|c| c.name().to_string())
            .collect();

        let rows = statement
            .query()
            .fetch_all(&self.pool.reader)
            .await
            .map_err(|e| QueryError::ExecutionFailed(e.to_string()))?;

        let mut decoded = Vec::with_capacity(rows.len());
        for row in &rows {
            decoded.push(
                decode_row(row, columns.len())
                    .map_err(|e| QueryError::ExecutionFailed(e.to_string()))?,
            );
        }

        Ok(ResultSet {
            columns,
            rows: decoded,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tabletalk_types::value::SqlValue;

    async fn seeded_executor() -> SqliteQueryExecutor {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        std::mem::forget(dir);
        let pool = DatabasePool::open(&db_path).await.unwrap();

        sqlx::raw_sql(
            r#"
            CREATE TABLE products (id INTEGER PRIMARY KEY, name TEXT NOT NULL, price REAL NOT NULL);
            INSERT INTO products VALUES (1, 'Keyboard', 49.0), (2, 'Mouse', 19.5), (3, 'Monitor', 179.0);
            "#,
        )
        .execute(&pool.writer)
        .await
        .unwrap();

        SqliteQueryExecutor::new(pool)
    }

    #[tokio::test]
    async fn test_select_returns_columns_and_rows() {
        let executor = seeded_executor().await;
        let result = executor
            .execute("SELECT name, price FROM products ORDER BY price")
            .await
            .unwrap();

        assert_eq!(result.columns, vec!["name", "price"]);
        assert_eq!(result.row_count(), 3);
        assert_eq!(result.rows[0][0], SqlValue::Text("Mouse".to_string()));
    }

    #[tokio::test]
    async fn test_aggregate_query() {
        let executor = seeded_executor().await;
        let result = executor
            .execute("SELECT COUNT(*) AS n, SUM(price) AS total FROM products")
            .await
            .unwrap();

        assert_eq!(result.columns, vec!["n", "total"]);
        assert_eq!(result.rows[0][0], SqlValue::Integer(3));
        assert_eq!(result.rows[0][1], SqlValue::Real(247.5));
    }

    #[tokio::test]
    async fn test_empty_result_keeps_column_names() {
        let executor = seeded_executor().await;
        let result = executor
            .execute("SELECT name FROM products WHERE price > 10000")
            .await
            .unwrap();

        assert_eq!(result.columns, vec!["name"]);
        assert!(result.is_empty());
    }

    #[tokio::test]
    async fn test_write_statement_rejected_before_execution() {
        let executor = seeded_executor().await;
        let err = executor
            .execute("DELETE FROM products")
            .await
            .unwrap_err();
        assert!(matches!(err, QueryError::RejectedStatement(_)));

        // And the data is untouched.
        let result = executor
            .execute("SELECT COUNT(*) AS n FROM products")
            .await
            .unwrap();
        assert_eq!(result.rows[0][0], SqlValue::Integer(3));
    }

    #[tokio::test]
    async fn test_syntax_error_is_execution_failure() {
        let executor = seeded_executor().await;
        let err = executor
            .execute("SELECT nonexistent_column FROM products")
            .await
            .unwrap_err();
        assert!(matches!(err, QueryError::ExecutionFailed(_)));
    }

    #[tokio::test]
    async fn test_cte_allowed() {
        let executor = seeded_executor().await;
        let result = executor
            .execute("WITH cheap AS (SELECT * FROM products WHERE price < 50) SELECT COUNT(*) AS n FROM cheap")
            .await
            .unwrap();
        assert_eq!(result.rows[0][0], SqlValue::Integer(2));
    }

    // -- full pipeline against a real database ---------------------------

    mod pipeline {
        use super::*;
        use std::sync::Arc;

        use tabletalk_core::index::embedder::Embedder;
        use tabletalk_core::index::retriever::Retriever;
        use tabletalk_core::llm::provider::LlmProvider;
        use tabletalk_core::pipeline::history::HistoryRing;
        use tabletalk_core::pipeline::service::AskService;
        use tabletalk_types::error::LlmError;
        use tabletalk_types::llm::{FinishReason, Generation, GenerationRequest, TokenUsage};

        use crate::vector::store::SqliteVectorIndex;

        /// Always answers with the same SQL, fences included, the way a
        /// real model tends to.
        struct EchoProvider(&'static str);

        impl LlmProvider for EchoProvider {
            fn name(&self) -> &str {
                "echo"
            }

            fn model(&self) -> &str {
                "echo-model"
            }

            async fn generate(&self, _request: &GenerationRequest) -> Result<Generation, LlmError> {
                Ok(Generation {
                    text: self.0.to_string(),
                    model: "echo-model".to_string(),
                    finish_reason: FinishReason::Stop,
                    usage: TokenUsage::default(),
                })
            }
        }

        struct FixedEmbedder;

        impl Embedder for FixedEmbedder {
            async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, LlmError> {
                Ok(texts.iter().map(|_| vec![1.0, 0.0]).collect())
            }

            fn model_name(&self) -> &str {
                "fixed-embed"
            }

            fn dimension(&self) -> usize {
                2
            }
        }

        #[tokio::test]
        async fn test_question_to_rows_on_real_database() {
            let dir = tempfile::tempdir().unwrap();
            let db_path = dir.path().join("store.db");
            let index_path = dir.path().join("index.db");
            std::mem::forget(dir);

            let pool = DatabasePool::open(&db_path).await.unwrap();
            crate::sqlite::seed::seed_demo(&pool).await.unwrap();

            let index_pool = DatabasePool::open(&index_path).await.unwrap();
            let index = SqliteVectorIndex::open(index_pool).await.unwrap();

            let service = AskService::new(
                EchoProvider("```sql\nSELECT name, city FROM customers ORDER BY name;\n```"),
                Retriever::new(FixedEmbedder, index, 3),
                SqliteQueryExecutor::new(pool),
                4_000,
                Arc::new(HistoryRing::new(10)),
            );

            let outcome = service.ask("list all customers", false).await.unwrap();

            assert!(outcome.sql.contains("customers"));
            assert_eq!(outcome.result.columns, vec!["name", "city"]);
            assert_eq!(outcome.result.row_count(), 8);
            assert_eq!(
                outcome.result.rows[0][0],
                SqlValue::Text("Alice Johnson".to_string())
            );
        }

        #[tokio::test]
        async fn test_generated_write_never_reaches_the_database() {
            let dir = tempfile::tempdir().unwrap();
            let db_path = dir.path().join("store.db");
            let index_path = dir.path().join("index.db");
            std::mem::forget(dir);

            let pool = DatabasePool::open(&db_path).await.unwrap();
            crate::sqlite::seed::seed_demo(&pool).await.unwrap();

            let index_pool = DatabasePool::open(&index_path).await.unwrap();
            let index = SqliteVectorIndex::open(index_pool).await.unwrap();

            let service = AskService::new(
                EchoProvider("DROP TABLE customers"),
                Retriever::new(FixedEmbedder, index, 3),
                SqliteQueryExecutor::new(pool.clone()),
                4_000,
                Arc::new(HistoryRing::new(10)),
            );

            let err = service.ask("remove everything", false).await.unwrap_err();
            assert!(matches!(
                err,
                tabletalk_core::pipeline::service::AskError::Query(
                    QueryError::RejectedStatement(_)
                )
            ));

            let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM customers")
                .fetch_one(&pool.reader)
                .await
                .unwrap();
            assert_eq!(count.0, 8);
        }
    }
}
