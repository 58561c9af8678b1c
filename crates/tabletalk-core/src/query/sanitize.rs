//! Cleaning generated SQL before it touches the database.
//!
//! LLMs wrap SQL in Markdown fences, add trailing prose, and
//! occasionally return nothing usable. `extract_sql` normalizes all of
//! that into a single bare statement; `ensure_read_only` is the last
//! defense before execution on top of the read-only connection.

use tabletalk_types::error::QueryError;

/// Statement keywords allowed through to execution.
const READ_KEYWORDS: &[&str] = &["SELECT", "WITH", "EXPLAIN"];

/// Extract one bare SQL statement from a raw model response.
///
/// Strips ```sql / ``` fences, trims whitespace, and keeps only the
/// first statement when the model returns several.
pub fn extract_sql(raw: &str) -> Result<String, QueryError> {
    let mut text = raw.trim();

    if let Some(rest) = text.strip_prefix("```sql") {
        text = rest;
    } else if let Some(rest) = text.strip_prefix("```") {
        text = rest;
    }
    if let Some(rest) = text.strip_suffix("```") {
        text = rest;
    }
    let text = text.trim();

    // Naive split: a semicolon inside a string literal would truncate.
    // Acceptable for generated single-statement SELECTs.
    let statement = text
        .split(';')
        .map(str::trim)
        .find(|part| !part.is_empty())
        .unwrap_or("");

    if statement.is_empty() {
        return Err(QueryError::EmptyStatement);
    }
    Ok(statement.to_string())
}

/// Reject statements that are not reads.
///
/// The executor's connection is read-only anyway; this gate exists so a
/// generated `DROP TABLE` is refused with a clear message instead of a
/// driver error.
pub fn ensure_read_only(sql: &str) -> Result<(), QueryError> {
    let first = sql
        .split_whitespace()
        .next()
        .unwrap_or("")
        .to_uppercase();

    if READ_KEYWORDS.contains(&first.as_str()) {
        Ok(())
    } else {
        Err(QueryError::RejectedStatement(format!(
            "only read statements are allowed, got '{first}'"
        )))
    }
}
