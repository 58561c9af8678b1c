//! First-run setup: config template and optional demo database.

use anyhow::Result;
use console::style;

use tabletalk_infra::secret::env::API_KEY_VAR;
use tabletalk_infra::sqlite::seed::seed_demo;

use crate::state::AppState;

/// Config written on first init. Hand-maintained rather than serialized
/// so optional fields stay visible as comments.
const CONFIG_TEMPLATE: &str = r#"# Tabletalk configuration. Every field is optional; the values below are
# the defaults. The API key is never read from this file -- export
# GOOGLE_API_KEY instead.

[database]
# Database that generated SQL runs against.
# path = "/path/to/your.db"        # default: {data_dir}/tabletalk.db

[index]
# path = "/path/to/index.db"       # default: {data_dir}/index.db
top_k = 3

[llm]
model = "gemini-2.0-flash-exp"
embedding_model = "text-embedding-004"
max_context_tokens = 4000

[server]
host = "127.0.0.1"
port = 7878

[history]
capacity = 50
"#;

/// Prepare the data directory; seed the demo retail database with `--demo`.
///
/// Idempotent: an existing config is left alone and the demo seed uses
/// `CREATE TABLE IF NOT EXISTS` + `INSERT OR IGNORE`.
pub async fn init(state: &AppState, demo: bool, json: bool) -> Result<()> {
    let config_path = state.data_dir.join("config.toml");
    let wrote_config = if tokio::fs::try_exists(&config_path).await? {
        false
    } else {
        tokio::fs::write(&config_path, CONFIG_TEMPLATE).await?;
        true
    };

    if demo {
        seed_demo(&state.db_pool).await?;
    }

    if json {
        let result = serde_json::json!({
            "data_dir": state.data_dir.display().to_string(),
            "config_written": wrote_config,
            "demo_seeded": demo,
        });
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    println!();
    println!("  {} Tabletalk initialized", style("✓").green().bold());
    println!();
    println!(
        "  {}  {}",
        style("Data dir:").bold(),
        style(state.data_dir.display()).dim()
    );
    if wrote_config {
        println!("  {}  {}", style("Config:").bold(), config_path.display());
    } else {
        println!(
            "  {}  {} {}",
            style("Config:").bold(),
            config_path.display(),
            style("(already present)").dim()
        );
    }
    if demo {
        println!(
            "  {}  customers, products, orders, sales, inventory",
            style("Demo:").bold()
        );
    }
    println!();
    println!("  Next steps:");
    println!("    {} export {}=<your key>", style("1.").dim(), API_KEY_VAR);
    println!("    {} ttalk refresh", style("2.").dim());
    println!(
        "    {} ttalk ask {}",
        style("3.").dim(),
        style("\"which products are running low on stock?\"").yellow()
    );
    println!();

    Ok(())
}
