//! LLM request/response types for Tabletalk.
//!
//! The generation contract is deliberately small: text in, text out. SQL
//! generation and summarization both go through the same shapes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Request to an LLM provider for a single text generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// The user-turn content.
    pub prompt: String,
    /// System instructions, when the provider supports them.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<u32>,
}

impl GenerationRequest {
    /// A request with only a prompt, provider defaults for the rest.
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            system: None,
            temperature: None,
            max_output_tokens: None,
        }
    }

    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }
}

/// Response from an LLM provider for a non-streaming generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Generation {
    pub text: String,
    pub model: String,
    pub finish_reason: FinishReason,
    #[serde(default)]
    pub usage: TokenUsage,
}

/// Reason why the model stopped generating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinishReason {
    Stop,
    MaxTokens,
    Safety,
    Other,
}

impl fmt::Display for FinishReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FinishReason::Stop => write!(f, "stop"),
            FinishReason::MaxTokens => write!(f, "max_tokens"),
            FinishReason::Safety => write!(f, "safety"),
            FinishReason::Other => write!(f, "other"),
        }
    }
}

impl FromStr for FinishReason {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "stop" => Ok(FinishReason::Stop),
            "max_tokens" => Ok(FinishReason::MaxTokens),
            "safety" => Ok(FinishReason::Safety),
            "other" => Ok(FinishReason::Other),
            other => Err(format!("invalid finish reason: '{other}'")),
        }
    }
}

/// Token usage for a generation, when the provider reports it.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct TokenUsage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}
