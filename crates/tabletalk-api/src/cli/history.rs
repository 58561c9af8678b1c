//! Session history command.

use anyhow::Result;
use comfy_table::{presets, Cell, Color, ContentArrangement, Table};
use console::style;

use crate::state::AppState;

/// Show questions answered in this process, newest first.
///
/// The ring is in-process only, so a fresh CLI invocation starts empty;
/// the populated view lives in the server process.
pub async fn history(state: &AppState, limit: Option<usize>, json: bool) -> Result<()> {
    let entries = state.history.recent(limit);

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    if entries.is_empty() {
        println!();
        println!(
            "  {} No questions answered in this session.",
            style("i").blue().bold()
        );
        println!(
            "     While `ttalk serve` runs, its history is at {}",
            style("GET /api/v1/history").yellow()
        );
        println!();
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("When").fg(Color::White),
        Cell::new("Question").fg(Color::White),
        Cell::new("Status").fg(Color::White),
        Cell::new("Rows").fg(Color::White),
        Cell::new("Time").fg(Color::White),
    ]);

    for entry in &entries {
        let status_cell = if entry.succeeded {
            Cell::new("ok").fg(Color::Green)
        } else {
            Cell::new("failed").fg(Color::Red)
        };
        table.add_row(vec![
            Cell::new(entry.created_at.format("%H:%M:%S")),
            Cell::new(truncate(&entry.question, 48)),
            status_cell,
            Cell::new(entry.row_count),
            Cell::new(format!("{}ms", entry.elapsed_ms)).fg(Color::DarkGrey),
        ]);
    }

    println!();
    println!("{table}");
    println!();
    println!(
        "  {} entr{}",
        style(entries.len()).bold(),
        if entries.len() == 1 { "y" } else { "ies" }
    );
    println!();

    Ok(())
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() > max {
        let cut: String = text.chars().take(max).collect();
        format!("{cut}...")
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_short_text_unchanged() {
        assert_eq!(truncate("how many orders?", 48), "how many orders?");
    }

    #[test]
    fn test_truncate_long_text_gets_ellipsis() {
        let long = "x".repeat(60);
        let cut = truncate(&long, 48);
        assert!(cut.ends_with("..."));
        assert_eq!(cut.chars().count(), 51);
    }
}
