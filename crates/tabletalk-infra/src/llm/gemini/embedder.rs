//! GeminiEmbedder -- concrete [`Embedder`] implementation over the
//! `batchEmbedContents` endpoint.
//!
//! Descriptions and questions are embedded through the same model so
//! their vectors stay comparable. Inputs are chunked to the API's batch
//! limit; an empty input returns without touching the network.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};

use tabletalk_core::index::embedder::Embedder;
use tabletalk_types::error::LlmError;

use super::types::{BatchEmbedRequest, BatchEmbedResponse, Content, EmbedContentRequest, Part};

/// Default Generative Language API endpoint.
const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Maximum texts per batchEmbedContents call.
const BATCH_LIMIT: usize = 100;

/// Output dimensionality of text-embedding-004.
const EMBEDDING_DIMENSION: usize = 768;

/// Gemini embedding client.
pub struct GeminiEmbedder {
    client: reqwest::Client,
    api_key: SecretString,
    base_url: String,
    model: String,
}

impl GeminiEmbedder {
    /// Create a new embedder.
    ///
    /// # Arguments
    ///
    /// * `api_key` - Google API key wrapped in SecretString
    /// * `model` - Embedding model identifier (e.g., "text-embedding-004")
    pub fn new(api_key: SecretString, model: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .expect("failed to create reqwest client");

        Self {
            client,
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            model,
        }
    }

    /// Override the base URL (useful for testing or proxies).
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }

    fn to_batch_request(&self, texts: &[String]) -> BatchEmbedRequest {
        BatchEmbedRequest {
            requests: texts
                .iter()
                .map(|text| EmbedContentRequest {
                    model: format!("models/{}", self.model),
                    content: Content {
                        role: None,
                        parts: vec![Part { text: text.clone() }],
                    },
                })
                .collect(),
        }
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, LlmError> {
        let body = self.to_batch_request(texts);
        let url = format!(
            "{}/v1beta/models/{}:batchEmbedContents",
            self.base_url, self.model
        );

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", self.api_key.expose_secret())
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(match status.as_u16() {
                400 => LlmError::InvalidRequest(error_body),
                401 | 403 => LlmError::AuthenticationFailed,
                429 => LlmError::RateLimited {
                    retry_after_ms: None,
                },
                503 => LlmError::Overloaded(error_body),
                _ => LlmError::Provider {
                    message: format!("HTTP {status}: {error_body}"),
                },
            });
        }

        let batch: BatchEmbedResponse = response
            .json()
            .await
            .map_err(|e| LlmError::Deserialization(format!("failed to parse response: {e}")))?;

        if batch.embeddings.len() != texts.len() {
            return Err(LlmError::Deserialization(format!(
                "requested {} embeddings, got {}",
                texts.len(),
                batch.embeddings.len()
            )));
        }

        Ok(batch.embeddings.into_iter().map(|e| e.values).collect())
    }
}

impl Embedder for GeminiEmbedder {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, LlmError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let mut vectors = Vec::with_capacity(texts.len());
        for chunk in texts.chunks(BATCH_LIMIT) {
            vectors.extend(self.embed_batch(chunk).await?);
        }
        Ok(vectors)
    }

    fn model_name(&self) -> &str {
        &self.model
    }

    fn dimension(&self) -> usize {
        EMBEDDING_DIMENSION
    }
}
