//! Schema browsing command.

use anyhow::Result;
use comfy_table::{presets, Cell, Color, ContentArrangement, Table};
use console::style;

use tabletalk_core::schema::catalog::SchemaCatalog;
use tabletalk_types::schema::TableSchema;

use crate::state::AppState;

/// List extracted tables with columns, keys, row counts, and the
/// foreign-key relationships between them.
pub async fn schema(state: &AppState, json: bool) -> Result<()> {
    let schemas = state.catalog().extract_all().await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&schemas)?);
        return Ok(());
    }

    if schemas.is_empty() {
        println!();
        println!(
            "  {} No tables found. Seed a demo database with: {}",
            style("i").blue().bold(),
            style("ttalk init --demo").yellow()
        );
        println!();
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("Table").fg(Color::White),
        Cell::new("Columns").fg(Color::White),
        Cell::new("Rows").fg(Color::White),
    ]);

    for schema in &schemas {
        table.add_row(vec![
            Cell::new(&schema.name).fg(Color::Cyan),
            Cell::new(column_summary(schema)),
            Cell::new(schema.row_count).fg(Color::DarkGrey),
        ]);
    }

    println!();
    println!("{table}");
    println!();

    let relationships: Vec<String> = schemas
        .iter()
        .flat_map(|schema| {
            schema
                .foreign_keys
                .iter()
                .map(move |fk| format!("{}.{}", schema.name, fk))
        })
        .collect();

    if !relationships.is_empty() {
        println!("  {}", style("── Relationships ──").dim());
        for relationship in &relationships {
            println!("  {relationship}");
        }
        println!();
    }

    println!(
        "  {} table{}",
        style(schemas.len()).bold(),
        if schemas.len() == 1 { "" } else { "s" }
    );
    println!();

    Ok(())
}

/// One line per column: name, declared type, key markers.
fn column_summary(schema: &TableSchema) -> String {
    schema
        .columns
        .iter()
        .map(|column| {
            let mut line = format!("{} {}", column.name, column.declared_type);
            if column.primary_key {
                line.push_str(" [pk]");
            } else if column.not_null {
                line.push_str(" [not null]");
            }
            line
        })
        .collect::<Vec<_>>()
        .join("\n")
}
