//! Deterministic natural-language descriptions of table schemas.
//!
//! These blurbs are what gets embedded into the vector index, so they
//! must be stable: the same metadata always yields the same string, and
//! therefore the same fingerprint and the same vector.

use tabletalk_types::schema::TableSchema;

/// Render one table's metadata into a retrieval blurb.
///
/// Always contains the table name and every column name. Appends primary
/// key, foreign-key relationships, and a few content hints inferred from
/// column naming so that questions phrased in business terms ("revenue",
/// "when") still land near the right tables.
pub fn describe_table(schema: &TableSchema) -> String {
    let col_parts: Vec<String> = schema
        .columns
        .iter()
        .map(|c| {
            if c.declared_type.is_empty() {
                c.name.clone()
            } else {
                format!("{} ({})", c.name, c.declared_type)
            }
        })
        .collect();

    let mut description = format!(
        "Table {} contains {} records with columns: {}.",
        schema.name,
        schema.row_count,
        col_parts.join(", ")
    );

    let pk = schema.primary_key();
    if !pk.is_empty() {
        description.push_str(&format!(" Primary key: {}.", pk.join(", ")));
    }

    if !schema.foreign_keys.is_empty() {
        let fk_parts: Vec<String> = schema
            .foreign_keys
            .iter()
            .map(|fk| format!("{} references {}", fk.column, fk.references_table))
            .collect();
        description.push_str(&format!(
            " Foreign key relationships: {}.",
            fk_parts.join(", ")
        ));
    }

    let hints = content_hints(schema);
    if !hints.is_empty() {
        description.push_str(&format!(" This table stores {}.", hints.join(", ")));
    }

    description
}

/// Content hints inferred from column names, in a fixed order.
fn content_hints(schema: &TableSchema) -> Vec<&'static str> {
    let lower: Vec<String> = schema
        .columns
        .iter()
        .map(|c| c.name.to_lowercase())
        .collect();
    let any = |needles: &[&str]| {
        lower
            .iter()
            .any(|name| needles.iter().any(|n| name.contains(n)))
    };

    let mut hints = Vec::new();
    if any(&["price", "amount", "cost", "total"]) {
        hints.push("financial information");
    }
    if any(&["date", "time"]) {
        hints.push("temporal data");
    }
    if any(&["name", "title"]) {
        hints.push("descriptive names");
    }
    hints
}
