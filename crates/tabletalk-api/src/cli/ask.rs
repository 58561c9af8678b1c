//! Ask command: run the question-to-results pipeline and render it.

use anyhow::Result;
use comfy_table::{presets, Cell, Color, ContentArrangement, Table};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::Instrument;

use tabletalk_observe::genai_attrs;
use tabletalk_types::query::AskOutcome;
use tabletalk_types::value::ResultSet;

use crate::state::AppState;

/// Rows rendered before the result table is cut off with a "more rows" note.
const ROW_DISPLAY_LIMIT: usize = 40;

/// Answer one question and render intent, context, SQL, rows, and summary.
pub async fn ask(state: &AppState, question: &str, summary: bool, json: bool) -> Result<()> {
    let service = state.ask_service().await?;

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap(),
    );
    spinner.set_message("Thinking...");
    spinner.enable_steady_tick(std::time::Duration::from_millis(80));

    let span = tracing::info_span!(
        "ask",
        "gen_ai.operation.name" = genai_attrs::OP_GENERATE_SQL,
        "gen_ai.provider.name" = genai_attrs::PROVIDER_GEMINI,
        "gen_ai.request.model" = %state.config.llm.model,
    );
    let outcome = service.ask(question, summary).instrument(span).await;

    spinner.finish_and_clear();
    let outcome = outcome?;

    if json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
        return Ok(());
    }

    render(&outcome);
    Ok(())
}

fn render(outcome: &AskOutcome) {
    println!();
    println!(
        "  {} Answered in {}ms",
        style("✓").green().bold(),
        outcome.elapsed_ms
    );
    println!(
        "  {}  {} (confidence {:.2})",
        style("Intent:").bold(),
        outcome.intent.kind,
        outcome.intent.confidence
    );
    println!();

    if !outcome.context.is_empty() {
        println!("  {}", style("── Context ──").dim());
        for ranked in &outcome.context {
            println!(
                "  {}  {}",
                style(&ranked.table).cyan(),
                style(format!("(similarity {:.3})", ranked.score)).dim()
            );
        }
        for dropped in &outcome.dropped_context {
            println!(
                "  {}  {}",
                dropped,
                style("(dropped to fit the prompt budget)").yellow()
            );
        }
        println!();
    }

    println!("  {}", style("── SQL ──").dim());
    println!("  {}", style(&outcome.sql).yellow());
    println!();

    println!(
        "  {}",
        style(format!(
            "── Results ({} row{}) ──",
            outcome.result.row_count(),
            if outcome.result.row_count() == 1 { "" } else { "s" }
        ))
        .dim()
    );
    if outcome.result.is_empty() {
        println!("  {}", style("(no rows)").dim());
    } else {
        println!("{}", result_table(&outcome.result));
        if outcome.result.row_count() > ROW_DISPLAY_LIMIT {
            println!(
                "  {}",
                style(format!(
                    "... {} more rows (use --json for all of them)",
                    outcome.result.row_count() - ROW_DISPLAY_LIMIT
                ))
                .dim()
            );
        }
    }
    println!();

    if let Some(summary) = &outcome.summary {
        println!("  {}", style("── Summary ──").dim());
        println!("  {summary}");
        println!();
    }

    for warning in &outcome.warnings {
        println!(
            "  {} {}",
            style("!").yellow().bold(),
            style(warning).yellow()
        );
    }
    if !outcome.warnings.is_empty() {
        println!();
    }
}

fn result_table(result: &ResultSet) -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(
        result
            .columns
            .iter()
            .map(|c| Cell::new(c).fg(Color::White))
            .collect::<Vec<_>>(),
    );

    for row in result.rows.iter().take(ROW_DISPLAY_LIMIT) {
        table.add_row(row.iter().map(|v| v.to_string()).collect::<Vec<_>>());
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use tabletalk_types::value::SqlValue;

    #[test]
    fn test_result_table_caps_rows() {
        let result = ResultSet {
            columns: vec!["n".to_string()],
            rows: (0..100).map(|i| vec![SqlValue::Integer(i)]).collect(),
        };
        let table = result_table(&result);
        assert_eq!(table.row_iter().count(), ROW_DISPLAY_LIMIT);
    }

    #[test]
    fn test_result_table_renders_all_value_kinds() {
        let result = ResultSet {
            columns: vec!["a".to_string(), "b".to_string(), "c".to_string()],
            rows: vec![vec![
                SqlValue::Null,
                SqlValue::Real(2.5),
                SqlValue::Text("hi".to_string()),
            ]],
        };
        let rendered = result_table(&result).to_string();
        assert!(rendered.contains("NULL"));
        assert!(rendered.contains("2.5"));
        assert!(rendered.contains("hi"));
    }
}
