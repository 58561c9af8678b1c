//! Refresh command: sync the vector index with the live schema.

use anyhow::Result;
use comfy_table::{presets, Cell, Color, ContentArrangement, Table};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::Instrument;

use tabletalk_observe::genai_attrs;
use tabletalk_types::retrieval::RefreshReport;

use crate::state::AppState;

/// Run one index sweep and report what changed.
pub async fn refresh(state: &AppState, json: bool) -> Result<()> {
    let indexer = state.indexer().await?;

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap(),
    );
    spinner.set_message("Embedding schema descriptions...");
    spinner.enable_steady_tick(std::time::Duration::from_millis(80));

    let span = tracing::info_span!(
        "refresh",
        "gen_ai.operation.name" = genai_attrs::OP_EMBED_SCHEMA,
        "gen_ai.provider.name" = genai_attrs::PROVIDER_GEMINI,
        "gen_ai.request.model" = %state.config.llm.embedding_model,
    );
    let report = indexer.refresh().instrument(span).await;

    spinner.finish_and_clear();
    let report = report?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    render(&report);
    Ok(())
}

fn render(report: &RefreshReport) {
    println!();
    println!(
        "  {} Index refreshed in {}ms",
        style("✓").green().bold(),
        report.elapsed_ms
    );
    println!();
    println!("  Embedded:  {}", style(report.indexed.len()).green());
    println!("  Unchanged: {}", report.skipped.len());
    if !report.removed.is_empty() {
        println!("  Removed:   {}", style(report.removed.len()).yellow());
    }
    println!("  Indexed tables: {}", style(report.live_tables()).bold());

    if !report.is_clean() {
        println!();
        println!("  {}", style("── Failures ──").dim());
        let mut table = Table::new();
        table.load_preset(presets::UTF8_FULL_CONDENSED);
        table.set_content_arrangement(ContentArrangement::Dynamic);
        table.set_header(vec![
            Cell::new("Table").fg(Color::White),
            Cell::new("Reason").fg(Color::White),
        ]);
        for failure in &report.failed {
            table.add_row(vec![
                Cell::new(&failure.table).fg(Color::Red),
                Cell::new(&failure.reason),
            ]);
        }
        println!("{table}");
    }

    if report.live_tables() == 0 && report.is_clean() {
        println!();
        println!(
            "  {} The database has no tables. Seed a demo with: {}",
            style("i").blue().bold(),
            style("ttalk init --demo").yellow()
        );
    }
    println!();
}
