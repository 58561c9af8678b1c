//! Result summarization helpers.
//!
//! Builds the second-call prompt that turns a result set into a
//! plain-language answer: question, SQL, a bounded row sample as JSON,
//! and simple numeric statistics so the model can mention ranges and
//! averages without inventing them.

use serde_json::{Map, Value, json};
use tabletalk_types::value::{ResultSet, SqlValue};

/// System instructions for the summarization call.
pub const SUMMARY_SYSTEM: &str = "You are a business analyst explaining query results.\n\
    Answer in 2-3 plain sentences without SQL jargon.\n\
    If the question is a yes/no question, start your answer with 'Yes' or 'No'.";

/// How many rows of the result are shown to the model.
pub const SAMPLE_ROW_LIMIT: usize = 20;

/// Per-numeric-column count/min/max/mean over the full result set.
///
/// Nulls and non-numeric cells are ignored; columns with no numeric
/// values are omitted entirely.
pub fn result_statistics(result: &ResultSet) -> Value {
    let mut stats = Map::new();

    for (idx, column) in result.columns.iter().enumerate() {
        let values: Vec<f64> = result
            .rows
            .iter()
            .filter_map(|row| row.get(idx).and_then(SqlValue::as_f64))
            .collect();
        if values.is_empty() {
            continue;
        }

        let count = values.len();
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let mean = values.iter().sum::<f64>() / count as f64;

        stats.insert(
            column.clone(),
            json!({ "count": count, "min": min, "max": max, "mean": mean }),
        );
    }

    Value::Object(stats)
}

/// The first `limit` rows as an array of column->value objects.
pub fn sample_rows(result: &ResultSet, limit: usize) -> Value {
    let rows: Vec<Value> = result
        .rows
        .iter()
        .take(limit)
        .map(|row| {
            let obj: Map<String, Value> = result
                .columns
                .iter()
                .zip(row.iter())
                .map(|(col, val)| {
                    (col.clone(), serde_json::to_value(val).unwrap_or(Value::Null))
                })
                .collect();
            Value::Object(obj)
        })
        .collect();
    Value::Array(rows)
}

/// Assemble the user-turn prompt for the summarization call.
pub fn build_summary_prompt(question: &str, sql: &str, result: &ResultSet) -> String {
    format!(
        "The user asked: {question}\n\n\
         This SQL was executed:\n{sql}\n\n\
         It returned {} rows. Sample (up to {SAMPLE_ROW_LIMIT}):\n{}\n\n\
         Numeric statistics over the full result:\n{}\n\n\
         Explain what these results mean in plain business language.",
        result.row_count(),
        sample_rows(result, SAMPLE_ROW_LIMIT),
        result_statistics(result),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result() -> ResultSet {
        ResultSet {
            columns: vec!["name".to_string(), "total".to_string()],
            rows: vec![
                vec![SqlValue::Text("Alice".to_string()), SqlValue::Real(10.0)],
                vec![SqlValue::Text("Bob".to_string()), SqlValue::Real(30.0)],
                vec![SqlValue::Text("Cleo".to_string()), SqlValue::Null],
            ],
        }
    }

    #[test]
    fn test_statistics_cover_numeric_columns_only() {
        let stats = result_statistics(&result());
        let total = stats.get("total").expect("total column stats");
        assert_eq!(total["count"], json!(2));
        assert_eq!(total["min"], json!(10.0));
        assert_eq!(total["max"], json!(30.0));
        assert_eq!(total["mean"], json!(20.0));
        assert!(stats.get("name").is_none());
    }

    #[test]
    fn test_sample_rows_respect_limit_and_pair_columns() {
        let sample = sample_rows(&result(), 2);
        let rows = sample.as_array().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["name"], json!("Alice"));
        assert_eq!(rows[1]["total"], json!(30.0));
    }

    #[test]
    fn test_summary_prompt_mentions_question_sql_and_rows() {
        let prompt = build_summary_prompt(
            "who spent the most?",
            "SELECT name, total FROM sales",
            &result(),
        );
        assert!(prompt.contains("who spent the most?"));
        assert!(prompt.contains("SELECT name, total FROM sales"));
        assert!(prompt.contains("3 rows"));
    }
}
