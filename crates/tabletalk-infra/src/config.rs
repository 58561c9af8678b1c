//! Global configuration loader for Tabletalk.
//!
//! Reads `config.toml` from the data directory (`~/.tabletalk/` in
//! production) and deserializes it into [`AppConfig`]. Falls back to
//! defaults when the file is missing or malformed, so a fresh install
//! works with zero configuration.

use std::path::{Path, PathBuf};

use tabletalk_types::config::AppConfig;

/// Resolve the data directory.
///
/// `TABLETALK_DATA_DIR` overrides; otherwise `~/.tabletalk`.
pub fn data_dir() -> PathBuf {
    match std::env::var("TABLETALK_DATA_DIR") {
        Ok(dir) => PathBuf::from(dir),
        Err(_) => dirs::home_dir()
            .map(|home| home.join(".tabletalk"))
            .unwrap_or_else(|| PathBuf::from(".tabletalk")),
    }
}

/// Load configuration from `{data_dir}/config.toml`.
///
/// - If the file does not exist, returns [`AppConfig::default()`].
/// - If the file exists but fails to parse, logs a warning and returns
///   the default.
/// - If the file exists and parses successfully, returns the parsed
///   config.
pub async fn load_app_config(data_dir: &Path) -> AppConfig {
    let config_path = data_dir.join("config.toml");

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config.toml found at {}, using defaults", config_path.display());
            return AppConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", config_path.display());
            return AppConfig::default();
        }
    };

    match toml::from_str::<AppConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(
                "Failed to parse {}: {err}, using defaults",
                config_path.display()
            );
            AppConfig::default()
        }
    }
}

/// The target database path: the configured one, or
/// `{data_dir}/tabletalk.db` (where `init` seeds the demo store).
pub fn database_path(config: &AppConfig, data_dir: &Path) -> PathBuf {
    config
        .database
        .path
        .clone()
        .unwrap_or_else(|| data_dir.join("tabletalk.db"))
}

/// The vector index path: the configured one, or `{data_dir}/index.db`.
///
/// Always a separate file from the target database so generated SQL can
/// never read or clobber index rows.
pub fn index_path(config: &AppConfig, data_dir: &Path) -> PathBuf {
    config
        .index
        .path
        .clone()
        .unwrap_or_else(|| data_dir.join("index.db"))
}
