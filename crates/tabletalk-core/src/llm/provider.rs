//! LlmProvider trait definition.
//!
//! This is the core abstraction over hosted text-generation APIs. The
//! pipeline uses it twice per request at most: once to generate SQL and
//! once (optionally) to summarize results.

use tabletalk_types::error::LlmError;
use tabletalk_types::llm::{Generation, GenerationRequest};

/// Trait for LLM provider backends (Gemini, stubs in tests).
///
/// Uses native async fn in traits (RPITIT, Rust 2024 edition).
/// Implementations live in tabletalk-infra (e.g., `GeminiProvider`).
pub trait LlmProvider: Send + Sync {
    /// Human-readable provider name (e.g., "gemini").
    fn name(&self) -> &str;

    /// The model this provider generates with (e.g., "gemini-2.0-flash-exp").
    fn model(&self) -> &str;

    /// Send a generation request and receive the full response.
    ///
    /// No retries: a failure here aborts the current request and is
    /// reported to the caller.
    fn generate(
        &self,
        request: &GenerationRequest,
    ) -> impl std::future::Future<Output = Result<Generation, LlmError>> + Send;
}
