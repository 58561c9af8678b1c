//! Question-to-context retrieval.
//!
//! Embeds the incoming question with the same model the index was built
//! with and returns the top-K nearest table schemas. An empty index is a
//! normal state (fresh install, `refresh` never run), not an error.

use tabletalk_types::error::{IndexError, LlmError};
use tabletalk_types::retrieval::SchemaHit;

use crate::index::embedder::Embedder;
use crate::index::store::VectorIndex;

/// Errors from retrieval: either the embedding call or the index lookup.
#[derive(Debug, thiserror::Error)]
pub enum RetrieveError {
    #[error(transparent)]
    Embedding(#[from] LlmError),

    #[error(transparent)]
    Index(#[from] IndexError),
}

/// Service that turns a question into ranked schema context.
pub struct Retriever<E: Embedder, V: VectorIndex> {
    embedder: E,
    index: V,
    top_k: usize,
}

impl<E: Embedder, V: VectorIndex> Retriever<E, V> {
    pub fn new(embedder: E, index: V, top_k: usize) -> Self {
        Self {
            embedder,
            index,
            top_k,
        }
    }

    /// Top-K schema hits for a question, similarity descending.
    ///
    /// Returns an empty vec on an empty index without touching the
    /// embedding API, so a fresh install degrades to the no-context
    /// prompt instead of failing.
    pub async fn retrieve(&self, question: &str) -> Result<Vec<SchemaHit>, RetrieveError> {
        if self.index.count().await? == 0 {
            tracing::debug!("vector index is empty; returning no context");
            return Ok(Vec::new());
        }

        let vectors = self
            .embedder
            .embed(std::slice::from_ref(&question.to_string()))
            .await?;
        let query = vectors.into_iter().next().ok_or_else(|| {
            LlmError::Deserialization("embedder returned no vector for query".to_string())
        })?;

        let hits = self
            .index
            .search(&query, self.embedder.model_name(), self.top_k)
            .await?;
        tracing::debug!(hits = hits.len(), top_k = self.top_k, "retrieved schema context");
        Ok(hits)
    }

    pub fn top_k(&self) -> usize {
        self.top_k
    }
}
