//! System status dashboard command.

use anyhow::Result;
use console::style;

use tabletalk_core::index::store::VectorIndex;
use tabletalk_core::schema::catalog::SchemaCatalog;
use tabletalk_infra::config::database_path;
use tabletalk_infra::secret::env::API_KEY_VAR;

use crate::state::AppState;

/// Display system status: database, index, models, server, credentials.
pub async fn status(state: &AppState, json: bool) -> Result<()> {
    let schemas = state.catalog().extract_all().await.unwrap_or_default();
    let index = state.vector_index().await?;
    let indexed = index.count().await?;

    let db_path = database_path(&state.config, &state.data_dir);

    if json {
        let status = serde_json::json!({
            "version": env!("CARGO_PKG_VERSION"),
            "data_dir": state.data_dir.display().to_string(),
            "database": {
                "path": db_path.display().to_string(),
                "tables": schemas.len(),
            },
            "index": {
                "entries": indexed,
                "embedding_model": state.config.llm.embedding_model,
            },
            "llm": {
                "model": state.config.llm.model,
                "max_context_tokens": state.config.llm.max_context_tokens,
            },
            "server": {
                "host": state.config.server.host,
                "port": state.config.server.port,
            },
            "api_key_present": state.has_api_key(),
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }

    println!();
    println!(
        "  {} Tabletalk v{}",
        style("⚡").bold(),
        env!("CARGO_PKG_VERSION")
    );
    println!();

    println!("  {}", style("── Database ──").dim());
    println!("  Path:   {}", style(db_path.display()).dim());
    println!("  Tables: {}", style(schemas.len()).bold());
    println!();

    println!("  {}", style("── Index ──").dim());
    println!("  Entries: {}", style(indexed).bold());
    println!(
        "  Model:   {}",
        style(&state.config.llm.embedding_model).dim()
    );
    if schemas.len() as u64 != indexed {
        println!(
            "  {} Index out of sync ({} tables, {} indexed). Run {}.",
            style("!").yellow().bold(),
            schemas.len(),
            indexed,
            style("ttalk refresh").yellow()
        );
    }
    println!();

    println!("  {}", style("── Generation ──").dim());
    println!("  Model:  {}", style(&state.config.llm.model).dim());
    println!(
        "  Budget: {} context tokens",
        state.config.llm.max_context_tokens
    );
    println!();

    println!("  {}", style("── Server ──").dim());
    println!(
        "  Bind: {}:{}",
        state.config.server.host, state.config.server.port
    );
    println!();

    println!("  {}", style("── Credentials ──").dim());
    if state.has_api_key() {
        println!("  {} {} set", style("✓").green(), API_KEY_VAR);
    } else {
        println!("  {} {} not set", style("✗").red(), API_KEY_VAR);
    }
    println!();

    Ok(())
}
