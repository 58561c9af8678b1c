//! Query intent, per-request outcomes, and history entries.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::retrieval::RankedTable;
use crate::value::ResultSet;

/// Broad category of a natural-language question, derived by keyword
/// scoring before any LLM call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryKind {
    Select,
    Aggregate,
    Filter,
    Join,
    Temporal,
}

impl fmt::Display for QueryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryKind::Select => write!(f, "select"),
            QueryKind::Aggregate => write!(f, "aggregate"),
            QueryKind::Filter => write!(f, "filter"),
            QueryKind::Join => write!(f, "join"),
            QueryKind::Temporal => write!(f, "temporal"),
        }
    }
}

impl FromStr for QueryKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "select" => Ok(QueryKind::Select),
            "aggregate" => Ok(QueryKind::Aggregate),
            "filter" => Ok(QueryKind::Filter),
            "join" => Ok(QueryKind::Join),
            "temporal" => Ok(QueryKind::Temporal),
            other => Err(format!("invalid query kind: '{other}'")),
        }
    }
}

/// Analyzed intent of a question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryIntent {
    pub kind: QueryKind,
    /// Whether the phrasing asks for an explanation rather than raw rows.
    pub needs_summary: bool,
    /// Keyword-match confidence in [0, 1].
    pub confidence: f64,
}

/// Everything one pipeline run produced, for rendering and for `--json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AskOutcome {
    pub question: String,
    pub intent: QueryIntent,
    /// Tables chosen as context, similarity rank descending.
    pub context: Vec<RankedTable>,
    /// Context tables dropped to fit the prompt budget (empty when none).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dropped_context: Vec<String>,
    pub sql: String,
    pub result: ResultSet,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    /// Non-fatal problems encountered along the way (e.g., summary failed).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
    pub elapsed_ms: u64,
}

/// One completed ask, as kept in the in-process history ring.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: Uuid,
    pub question: String,
    pub sql: String,
    pub row_count: usize,
    pub succeeded: bool,
    pub elapsed_ms: u64,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_kind_display_roundtrip() {
        for kind in [
            QueryKind::Select,
            QueryKind::Aggregate,
            QueryKind::Filter,
            QueryKind::Join,
            QueryKind::Temporal,
        ] {
            let parsed: QueryKind = kind.to_string().parse().unwrap();
            assert_eq!(parsed, kind);
        }
    }

    #[test]
    fn test_query_kind_from_str_rejects_unknown() {
        assert!("describe".parse::<QueryKind>().is_err());
    }

    #[test]
    fn test_query_intent_serde_roundtrip() {
        let intent = QueryIntent {
            kind: QueryKind::Aggregate,
            needs_summary: true,
            confidence: 0.4,
        };
        let json = serde_json::to_string(&intent).unwrap();
        let parsed: QueryIntent = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, intent);
    }

    #[test]
    fn test_ask_outcome_omits_empty_extras() {
        let outcome = AskOutcome {
            question: "list all customers".to_string(),
            intent: QueryIntent {
                kind: QueryKind::Select,
                needs_summary: false,
                confidence: 0.0,
            },
            context: vec![],
            dropped_context: vec![],
            sql: "SELECT * FROM customers".to_string(),
            result: ResultSet::default(),
            summary: None,
            warnings: vec![],
            elapsed_ms: 12,
        };
        let json = serde_json::to_string(&outcome).unwrap();
        assert!(!json.contains("summary"));
        assert!(!json.contains("warnings"));
        assert!(!json.contains("dropped_context"));
    }
}
