//! Prompt assembly for SQL generation.
//!
//! Deterministic templating: system instructions, retrieved schema
//! blocks in similarity-rank order, then the verbatim question. A
//! character-derived token estimate enforces the context budget; blocks
//! that would overflow are dropped whole (lowest rank first) and the
//! drop is recorded, never silent.

use tabletalk_types::retrieval::SchemaHit;
use tabletalk_types::schema::TableSchema;

/// System instructions for the SQL-generation call.
const SQL_SYSTEM: &str = "You are an expert SQL developer working with a SQLite database.\n\
    Generate a single SQLite-compatible SQL query that answers the user's question.\n\
    Return only the SQL query -- no explanations, no markdown fences.";

/// A fully assembled prompt plus the bookkeeping around it.
#[derive(Debug, Clone)]
pub struct BuiltPrompt {
    pub system: String,
    pub user: String,
    /// Tables whose schema blocks made it into the prompt, rank order.
    pub context_tables: Vec<String>,
    /// Tables dropped to fit the context budget, rank order.
    pub dropped_tables: Vec<String>,
}

impl BuiltPrompt {
    /// Whether the context budget forced any schema block out.
    pub fn truncated(&self) -> bool {
        !self.dropped_tables.is_empty()
    }
}

/// Builds generation prompts under an approximate token budget.
#[derive(Debug, Clone)]
pub struct PromptBuilder {
    max_context_tokens: usize,
}

impl PromptBuilder {
    pub fn new(max_context_tokens: usize) -> Self {
        Self { max_context_tokens }
    }

    /// Assemble the prompt for a question and its ranked schema context.
    ///
    /// The question itself is never dropped; only schema blocks compete
    /// for the budget. With no hits at all (empty index), the prompt
    /// falls back to generic instructions.
    pub fn build(&self, question: &str, hits: &[SchemaHit]) -> BuiltPrompt {
        let mut context_tables = Vec::new();
        let mut dropped_tables = Vec::new();
        let mut blocks: Vec<String> = Vec::new();
        let mut used_tokens = 0usize;
        let mut over_budget = false;

        for hit in hits {
            if over_budget {
                dropped_tables.push(hit.schema.name.clone());
                continue;
            }
            let block = format_schema_block(&hit.schema);
            let cost = estimate_tokens(&block);
            if used_tokens + cost > self.max_context_tokens && !blocks.is_empty() {
                // Keep at least the best-ranked block even if it alone
                // blows the budget; past that, drop whole blocks.
                over_budget = true;
                dropped_tables.push(hit.schema.name.clone());
                continue;
            }
            used_tokens += cost;
            context_tables.push(hit.schema.name.clone());
            blocks.push(block);
        }

        let user = if blocks.is_empty() {
            format!(
                "No schema information is available for this database.\n\n\
                 User question: {question}"
            )
        } else {
            format!(
                "Database schema (most relevant tables first):\n\n{}\n\nUser question: {question}",
                blocks.join("\n\n")
            )
        };

        if !dropped_tables.is_empty() {
            tracing::warn!(
                dropped = ?dropped_tables,
                budget = self.max_context_tokens,
                "schema context truncated to fit prompt budget"
            );
        }

        BuiltPrompt {
            system: SQL_SYSTEM.to_string(),
            user,
            context_tables,
            dropped_tables,
        }
    }
}

/// Approximate token count: four characters per token.
fn estimate_tokens(text: &str) -> usize {
    text.chars().count() / 4
}

/// One table's schema rendered as a prompt block.
fn format_schema_block(schema: &TableSchema) -> String {
    let mut block = format!("TABLE: {}\nRows: {}\nColumns:\n", schema.name, schema.row_count);

    for col in &schema.columns {
        let ty = if col.declared_type.is_empty() {
            String::new()
        } else {
            format!(" ({})", col.declared_type)
        };
        block.push_str(&format!("  {}{ty}", col.name));
        if col.primary_key {
            block.push_str(" [PRIMARY KEY]");
        }
        if col.not_null && !col.primary_key {
            block.push_str(" [NOT NULL]");
        }
        block.push('\n');
    }

    if !schema.foreign_keys.is_empty() {
        block.push_str("Foreign keys:\n");
        for fk in &schema.foreign_keys {
            block.push_str(&format!("  {fk}\n"));
        }
    }

    if !schema.sample_rows.is_empty() {
        let rows: Vec<String> = schema
            .sample_rows
            .iter()
            .map(|row| {
                let cells: Vec<String> = row.iter().map(ToString::to_string).collect();
                format!("({})", cells.join(", "))
            })
            .collect();
        block.push_str(&format!("Sample data: {}\n", rows.join("; ")));
    }

    block.trim_end().to_string()
}
