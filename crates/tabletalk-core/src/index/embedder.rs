//! Embedder trait for text-to-vector conversion.
//!
//! Defines the interface for embedding text into vectors for semantic
//! search. Implementations (e.g., the Gemini embedding API) live in
//! tabletalk-infra.

use tabletalk_types::error::LlmError;

/// Trait for converting text into embedding vectors.
///
/// Uses RPITIT (native async fn in traits, Rust 2024 edition).
/// Schema descriptions and questions must go through the same
/// implementation: vectors from different models are not comparable.
pub trait Embedder: Send + Sync {
    /// Embed one or more texts into vectors.
    ///
    /// Returns one vector per input text, in input order. Batch embedding
    /// is supported for efficiency when a refresh sweep has several
    /// descriptions to embed together.
    fn embed(
        &self,
        texts: &[String],
    ) -> impl std::future::Future<Output = Result<Vec<Vec<f32>>, LlmError>> + Send;

    /// The model name used for embeddings (e.g., "text-embedding-004").
    fn model_name(&self) -> &str;

    /// The dimensionality of the output vectors.
    fn dimension(&self) -> usize;
}
