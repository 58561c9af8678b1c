//! Global configuration types for Tabletalk.
//!
//! `AppConfig` represents the top-level `config.toml` that controls model
//! selection, retrieval depth, prompt budget, and server binding.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Top-level configuration for Tabletalk.
///
/// Loaded from `~/.tabletalk/config.toml`. All fields have sensible
/// defaults; an empty or missing file is valid. The API key never lives
/// here -- it comes from the `GOOGLE_API_KEY` environment variable.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub index: IndexConfig,

    #[serde(default)]
    pub llm: LlmConfig,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub history: HistoryConfig,
}

/// Location of the SQLite database that generated SQL runs against.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Defaults to `{data_dir}/tabletalk.db` when unset.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

/// Vector index location and retrieval depth.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexConfig {
    /// Defaults to `{data_dir}/index.db` when unset. Kept separate from
    /// the query database so generated SQL can never see index tables.
    #[serde(default)]
    pub path: Option<PathBuf>,

    /// How many tables to retrieve as prompt context.
    #[serde(default = "default_top_k")]
    pub top_k: usize,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            path: None,
            top_k: default_top_k(),
        }
    }
}

fn default_top_k() -> usize {
    3
}

/// Model selection and prompt budget.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Generation model for SQL and summaries.
    #[serde(default = "default_model")]
    pub model: String,

    /// Embedding model for descriptions and queries. Must stay consistent
    /// between indexing and querying for scores to be comparable.
    #[serde(default = "default_embedding_model")]
    pub embedding_model: String,

    /// Approximate token budget for schema context in the prompt
    /// (estimated as chars / 4).
    #[serde(default = "default_max_context_tokens")]
    pub max_context_tokens: usize,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            embedding_model: default_embedding_model(),
            max_context_tokens: default_max_context_tokens(),
        }
    }
}

fn default_model() -> String {
    "gemini-2.0-flash-exp".to_string()
}

fn default_embedding_model() -> String {
    "text-embedding-004".to_string()
}

fn default_max_context_tokens() -> usize {
    4_000
}

/// HTTP server binding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    7878
}

/// In-process query history ring.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryConfig {
    #[serde(default = "default_history_capacity")]
    pub capacity: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            capacity: default_history_capacity(),
        }
    }
}

fn default_history_capacity() -> usize {
    50
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_config_default_values() {
        let config = AppConfig::default();
        assert_eq!(config.index.top_k, 3);
        assert_eq!(config.llm.model, "gemini-2.0-flash-exp");
        assert_eq!(config.llm.embedding_model, "text-embedding-004");
        assert_eq!(config.llm.max_context_tokens, 4_000);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 7878);
        assert_eq!(config.history.capacity, 50);
        assert!(config.database.path.is_none());
    }

    #[test]
    fn test_app_config_deserialize_empty() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config.index.top_k, 3);
        assert_eq!(config.server.port, 7878);
    }

    #[test]
    fn test_app_config_deserialize_partial_override() {
        let toml_str = r#"
[index]
top_k = 5

[server]
port = 9000

[llm]
model = "gemini-pro"
"#;
        let config: AppConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.index.top_k, 5);
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.llm.model, "gemini-pro");
        // Untouched sections keep their defaults
        assert_eq!(config.llm.embedding_model, "text-embedding-004");
        assert_eq!(config.history.capacity, 50);
    }

    #[test]
    fn test_app_config_serde_roundtrip() {
        let mut config = AppConfig::default();
        config.database.path = Some(PathBuf::from("/tmp/shop.db"));
        config.index.top_k = 7;
        let json = serde_json::to_string(&config).unwrap();
        let parsed: AppConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.index.top_k, 7);
        assert_eq!(parsed.database.path, Some(PathBuf::from("/tmp/shop.db")));
    }
}
