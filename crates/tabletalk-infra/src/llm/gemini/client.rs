//! GeminiProvider -- concrete [`LlmProvider`] implementation for Google
//! Gemini.
//!
//! Sends non-streaming requests to
//! `/v1beta/models/{model}:generateContent` with the API key in the
//! `x-goog-api-key` header. The key is wrapped in
//! [`secrecy::SecretString`] and is never logged.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};

use tabletalk_core::llm::provider::LlmProvider;
use tabletalk_types::error::LlmError;
use tabletalk_types::llm::{FinishReason, Generation, GenerationRequest, TokenUsage};

use super::types::{
    Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig,
};

/// Default Generative Language API endpoint.
const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Gemini LLM provider.
///
/// Implements [`LlmProvider`] for the Generative Language API.
/// No retries: rate limits and overloads surface to the caller.
pub struct GeminiProvider {
    client: reqwest::Client,
    api_key: SecretString,
    base_url: String,
    model: String,
}

impl GeminiProvider {
    /// Create a new Gemini provider.
    ///
    /// # Arguments
    ///
    /// * `api_key` - Google API key wrapped in SecretString
    /// * `model` - Model identifier (e.g., "gemini-2.0-flash-exp")
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

    /// Build the full API URL for a given path.
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Convert a generic [`GenerationRequest`] into the Gemini wire shape.
    fn to_gemini_request(&self, request: &GenerationRequest) -> GenerateContentRequest {
        let generation_config =
            if request.temperature.is_some() || request.max_output_tokens.is_some() {
                Some(GenerationConfig {
                    temperature: request.temperature,
                    max_output_tokens: request.max_output_tokens,
                })
            } else {
                None
            };

        GenerateContentRequest {
            contents: vec![Content::user(request.prompt.clone())],
            system_instruction: request.system.as_ref().map(Content::system),
            generation_config,
        }
    }
}

/// Map a non-success HTTP status to an [`LlmError`].
fn error_for_status(
    status: reqwest::StatusCode,
    retry_after_ms: Option<u64>,
    body: String,
) -> LlmError {
    match status.as_u16() {
        400 => LlmError::InvalidRequest(body),
        401 | 403 => LlmError::AuthenticationFailed,
        429 => LlmError::RateLimited { retry_after_ms },
        503 => LlmError::Overloaded(body),
        _ => LlmError::Provider {
            message: format!("HTTP {status}: {body}"),
        },
    }
}

/// Seconds from a `Retry-After` header, as milliseconds.
fn retry_after_ms(response: &reqwest::Response) -> Option<u64> {
    response
        .headers()
        .get(reqwest::header::RETRY_AFTER)?
        .to_str()
        .ok()?
        .parse::<u64>()
        .ok()
        .map(|secs| secs * 1_000)
}

/// Map Gemini's finish-reason string onto the generic enum.
fn map_finish_reason(reason: Option<&str>) -> FinishReason {
    match reason {
        Some("STOP") | None => FinishReason::Stop,
        Some("MAX_TOKENS") => FinishReason::MaxTokens,
        Some("SAFETY") | Some("RECITATION") | Some("BLOCKLIST") | Some("PROHIBITED_CONTENT") => {
            FinishReason::Safety
        }
        Some(_) => FinishReason::Other,
    }
}

// GeminiProvider intentionally does NOT derive Debug so the key can
// never leak through formatting, even though SecretString redacts it.

impl LlmProvider for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<Generation, LlmError> {
        let body = self.to_gemini_request(request);
        let url = self.url(&format!("/v1beta/models/{}:generateContent", self.model));

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
            let retry_after = retry_after_ms(&response);
            let error_body = response.text().await.unwrap_or_default();
            return Err(error_for_status(status, retry_after, error_body));
        }

        let gemini_resp: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| LlmError::Deserialization(format!("failed to parse response: {e}")))?;

        let Some(candidate) = gemini_resp.candidates.first() else {
            // No candidates usually means the prompt itself was blocked.
            let reason = gemini_resp
                .prompt_feedback
                .and_then(|f| f.block_reason)
                .unwrap_or_else(|| "no candidates in response".to_string());
            return Err(LlmError::Refused(reason));
        };

        let finish_reason = map_finish_reason(candidate.finish_reason.as_deref());
        let text = candidate.text();
        if text.is_empty() && finish_reason == FinishReason::Safety {
            return Err(LlmError::Refused(
                candidate
                    .finish_reason
                    .clone()
                    .unwrap_or_else(|| "SAFETY".to_string()),
            ));
        }

        let usage = gemini_resp.usage_metadata.unwrap_or_default();

        Ok(Generation {
            text,
            model: self.model.clone(),
            finish_reason,
            usage: TokenUsage {
                input_tokens: usage.prompt_token_count,
                output_tokens: usage.candidates_token_count,
            },
        })
    }
}
