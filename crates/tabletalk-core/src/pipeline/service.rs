//! AskService: the linear per-request pipeline.
//!
//! intent -> retrieve -> prompt -> generate -> sanitize -> execute ->
//! summarize (optional) -> record history. Each stage either produces
//! the next stage's input or aborts the request with a typed error; the
//! only non-fatal stage is summarization.

use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use uuid::Uuid;

use tabletalk_types::error::{LlmError, QueryError};
use tabletalk_types::llm::{FinishReason, GenerationRequest};
use tabletalk_types::query::{AskOutcome, HistoryEntry};
use tabletalk_types::retrieval::RankedTable;
use tabletalk_types::value::ResultSet;

use crate::index::embedder::Embedder;
use crate::index::retriever::{RetrieveError, Retriever};
use crate::index::store::VectorIndex;
use crate::llm::provider::LlmProvider;
use crate::pipeline::history::HistoryRing;
use crate::pipeline::summary;
use crate::query::executor::QueryExecutor;
use crate::query::prompt::PromptBuilder;
use crate::query::{intent, sanitize};

/// Errors that abort an ask.
///
/// The variants preserve the failure-class split: retrieval/generation
/// problems are provider-side, [`QueryError`] means the database
/// rejected what the provider wrote.
#[derive(Debug, thiserror::Error)]
pub enum AskError {
    #[error("question is empty")]
    EmptyQuestion,

    #[error(transparent)]
    Retrieval(#[from] RetrieveError),

    #[error(transparent)]
    Generation(#[from] LlmError),

    #[error(transparent)]
    Query(#[from] QueryError),
}

/// Service orchestrating the full question-to-results pipeline.
///
/// Generic over the provider, embedder, index, and executor traits so
/// tabletalk-core never depends on tabletalk-infra.
pub struct AskService<L: LlmProvider, E: Embedder, V: VectorIndex, X: QueryExecutor> {
    provider: L,
    retriever: Retriever<E, V>,
    executor: X,
    prompt_builder: PromptBuilder,
    history: Arc<HistoryRing>,
}

impl<L: LlmProvider, E: Embedder, V: VectorIndex, X: QueryExecutor> AskService<L, E, V, X> {
    /// Create a new AskService.
    ///
    /// - `provider`: generation backend for SQL and summaries
    /// - `retriever`: question-to-schema-context lookup
    /// - `executor`: read path for generated SQL
    /// - `max_context_tokens`: prompt budget for schema blocks
    /// - `history`: shared ring the CLI and HTTP surfaces both read
    pub fn new(
        provider: L,
        retriever: Retriever<E, V>,
        executor: X,
        max_context_tokens: usize,
        history: Arc<HistoryRing>,
    ) -> Self {
        Self {
            provider,
            retriever,
            executor,
            prompt_builder: PromptBuilder::new(max_context_tokens),
            history,
        }
    }

    /// Answer one natural-language question.
    ///
    /// `force_summary` requests a summary even when intent analysis
    /// would not; a summary failure downgrades to a warning either way.
    pub async fn ask(&self, question: &str, force_summary: bool) -> Result<AskOutcome, AskError> {
        let started = Instant::now();
        let question = question.trim();
        if question.is_empty() {
            return Err(AskError::EmptyQuestion);
        }

        let intent = intent::analyze(question);
        tracing::debug!(kind = %intent.kind, confidence = intent.confidence, "analyzed question");

        let hits = self.retriever.retrieve(question).await?;
        let built = self.prompt_builder.build(question, &hits);

        let request = GenerationRequest::new(built.user.clone()).with_system(built.system.clone());
        let generation = self.provider.generate(&request).await?;

        let mut warnings = Vec::new();
        if generation.finish_reason != FinishReason::Stop {
            warnings.push(format!(
                "generation ended with '{}' instead of a clean stop",
                generation.finish_reason
            ));
        }

        let sql = sanitize::extract_sql(&generation.text)?;
        tracing::info!(%sql, "generated SQL");

        let result = match self.executor.execute(&sql).await {
            Ok(result) => result,
            Err(err) => {
                self.record(question, &sql, 0, false, &started);
                return Err(err.into());
            }
        };

        let summary = if intent.needs_summary || force_summary {
            match self.summarize(question, &sql, &result).await {
                Ok(text) => Some(text),
                Err(err) => {
                    tracing::warn!(error = %err, "summary generation failed");
                    warnings.push(format!("summary unavailable: {err}"));
                    None
                }
            }
        } else {
            None
        };

        self.record(question, &sql, result.row_count(), true, &started);

        Ok(AskOutcome {
            question: question.to_string(),
            intent,
            context: hits.iter().map(RankedTable::from).collect(),
            dropped_context: built.dropped_tables,
            sql,
            result,
            summary,
            warnings,
            elapsed_ms: started.elapsed().as_millis() as u64,
        })
    }

    /// Second LLM call: results in, plain-language explanation out.
    async fn summarize(
        &self,
        question: &str,
        sql: &str,
        result: &ResultSet,
    ) -> Result<String, LlmError> {
        let request = GenerationRequest::new(summary::build_summary_prompt(question, sql, result))
            .with_system(summary::SUMMARY_SYSTEM);
        let generation = self.provider.generate(&request).await?;
        let text = generation.text.trim();
        if text.is_empty() {
            return Err(LlmError::Refused("empty summary response".to_string()));
        }
        Ok(text.to_string())
    }

    fn record(&self, question: &str, sql: &str, row_count: usize, succeeded: bool, started: &Instant) {
        self.history.record(HistoryEntry {
            id: Uuid::now_v7(),
            question: question.to_string(),
            sql: sql.to_string(),
            row_count,
            succeeded,
            elapsed_ms: started.elapsed().as_millis() as u64,
            created_at: Utc::now(),
        });
    }

    pub fn history(&self) -> &Arc<HistoryRing> {
        &self.history
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use tabletalk_types::error::IndexError;
    use tabletalk_types::llm::{Generation, TokenUsage};
    use tabletalk_types::retrieval::{IndexUpsert, IndexedTable, SchemaHit};
    use tabletalk_types::value::SqlValue;

    /// Returns canned responses in order, then repeats the last one.
    struct ScriptedProvider {
        responses: Vec<Result<String, ()>>,
        calls: AtomicUsize,
    }

    impl ScriptedProvider {
        fn echoing(text: &str) -> Self {
            Self {
                responses: vec![Ok(text.to_string())],
                calls: AtomicUsize::new(0),
            }
        }
    }

    impl LlmProvider for ScriptedProvider {
        fn name(&self) -> &str {
            "scripted"
        }

        fn model(&self) -> &str {
            "scripted-model"
        }

        async fn generate(&self, _request: &GenerationRequest) -> Result<Generation, LlmError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            let idx = call.min(self.responses.len() - 1);
            match &self.responses[idx] {
                Ok(text) => Ok(Generation {
                    text: text.clone(),
                    model: "scripted-model".to_string(),
                    finish_reason: FinishReason::Stop,
                    usage: TokenUsage::default(),
                }),
                Err(()) => Err(LlmError::Network("connection reset".to_string())),
            }
        }
    }

    struct NoopEmbedder;

    impl Embedder for NoopEmbedder {
        async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, LlmError> {
            Ok(texts.iter().map(|_| vec![0.0, 1.0]).collect())
        }

        fn model_name(&self) -> &str {
            "stub-embed"
        }

        fn dimension(&self) -> usize {
            2
        }
    }

    #[derive(Default)]
    struct EmptyIndex;

    impl VectorIndex for EmptyIndex {
        async fn upsert(&self, _record: &IndexUpsert, _embedding: &[f32]) -> Result<(), IndexError> {
            Ok(())
        }

        async fn search(
            &self,
            _query_embedding: &[f32],
            _model: &str,
            _limit: usize,
        ) -> Result<Vec<SchemaHit>, IndexError> {
            Ok(vec![])
        }

        async fn remove(&self, _table: &str) -> Result<(), IndexError> {
            Ok(())
        }

        async fn list(&self) -> Result<Vec<IndexedTable>, IndexError> {
            Ok(vec![])
        }

        async fn count(&self) -> Result<u64, IndexError> {
            Ok(0)
        }
    }

    /// Recognizes `SELECT * FROM customers`; rejects everything else the
    /// way a database driver would.
    struct CustomersExecutor;

    impl QueryExecutor for CustomersExecutor {
        async fn execute(&self, sql: &str) -> Result<ResultSet, QueryError> {
            if sql == "SELECT * FROM customers" {
                Ok(ResultSet {
                    columns: vec!["id".to_string(), "name".to_string()],
                    rows: vec![
                        vec![SqlValue::Integer(1), SqlValue::Text("Alice".to_string())],
                        vec![SqlValue::Integer(2), SqlValue::Text("Bob".to_string())],
                    ],
                })
            } else {
                Err(QueryError::ExecutionFailed(format!(
                    "near \"{}\": syntax error",
                    sql.split_whitespace().next().unwrap_or("")
                )))
            }
        }
    }

    fn service(
        provider: ScriptedProvider,
    ) -> AskService<ScriptedProvider, NoopEmbedder, EmptyIndex, CustomersExecutor> {
        AskService::new(
            provider,
            Retriever::new(NoopEmbedder, EmptyIndex, 3),
            CustomersExecutor,
            4_000,
            Arc::new(HistoryRing::new(10)),
        )
    }

    #[tokio::test]
    async fn test_end_to_end_with_echoing_stub() {
        let svc = service(ScriptedProvider::echoing("SELECT * FROM customers"));
        let outcome = svc.ask("list all customers", false).await.unwrap();

        assert!(outcome.sql.contains("customers"));
        assert_eq!(outcome.result.row_count(), 2);
        assert_eq!(outcome.result.columns, vec!["id", "name"]);
        assert!(outcome.summary.is_none());
        assert!(outcome.warnings.is_empty());

        let history = svc.history().recent(None);
        assert_eq!(history.len(), 1);
        assert!(history[0].succeeded);
        assert_eq!(history[0].row_count, 2);
    }

    #[tokio::test]
    async fn test_fenced_response_is_cleaned_before_execution() {
        let svc = service(ScriptedProvider::echoing(
            "```sql\nSELECT * FROM customers;\n```",
        ));
        let outcome = svc.ask("list all customers", false).await.unwrap();
        assert_eq!(outcome.sql, "SELECT * FROM customers");
    }

    #[tokio::test]
    async fn test_malformed_sql_surfaces_as_execution_error() {
        let svc = service(ScriptedProvider::echoing("SELCT * FORM customers"));
        let err = svc.ask("list all customers", false).await.unwrap_err();

        match err {
            AskError::Query(QueryError::ExecutionFailed(msg)) => {
                assert!(msg.contains("syntax error"));
            }
            other => panic!("expected execution error, got: {other:?}"),
        }

        // The failed ask still lands in history.
        let history = svc.history().recent(None);
        assert_eq!(history.len(), 1);
        assert!(!history[0].succeeded);
    }

    #[tokio::test]
    async fn test_network_failure_is_not_an_execution_error() {
        let svc = service(ScriptedProvider {
            responses: vec![Err(())],
            calls: AtomicUsize::new(0),
        });
        let err = svc.ask("list all customers", false).await.unwrap_err();
        assert!(matches!(err, AskError::Generation(LlmError::Network(_))));
        // No SQL was ever produced, so nothing went into history.
        assert!(svc.history().is_empty());
    }

    #[tokio::test]
    async fn test_summary_failure_is_a_warning_not_an_error() {
        let svc = service(ScriptedProvider {
            responses: vec![Ok("SELECT * FROM customers".to_string()), Err(())],
            calls: AtomicUsize::new(0),
        });
        let outcome = svc.ask("list all customers", true).await.unwrap();
        assert!(outcome.summary.is_none());
        assert_eq!(outcome.warnings.len(), 1);
        assert!(outcome.warnings[0].contains("summary unavailable"));
    }

    #[tokio::test]
    async fn test_summary_requested_by_intent() {
        let svc = service(ScriptedProvider {
            responses: vec![
                Ok("SELECT * FROM customers".to_string()),
                Ok("Yes. There are two customers on record.".to_string()),
            ],
            calls: AtomicUsize::new(0),
        });
        let outcome = svc.ask("how many customers are there?", false).await.unwrap();
        assert_eq!(
            outcome.summary.as_deref(),
            Some("Yes. There are two customers on record.")
        );
    }

    #[tokio::test]
    async fn test_empty_question_rejected() {
        let svc = service(ScriptedProvider::echoing("SELECT 1"));
        let err = svc.ask("   ", false).await.unwrap_err();
        assert!(matches!(err, AskError::EmptyQuestion));
    }
}
