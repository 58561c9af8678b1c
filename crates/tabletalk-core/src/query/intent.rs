//! Keyword-based intent analysis.
//!
//! Runs before any LLM call: a cheap, fully deterministic read of what
//! shape of query the question is asking for, and whether the phrasing
//! wants an explanation on top of raw rows. Scores are keyword hit
//! counts; confidence is the winning score scaled into [0, 1].

use tabletalk_types::query::{QueryIntent, QueryKind};

const AGGREGATE_TERMS: &[&str] = &[
    "count", "sum", "average", "total", "how many", "maximum", "minimum", "highest", "lowest",
];

const FILTER_TERMS: &[&str] = &[
    "where", "filter", "only", "specific", "greater", "less", "more than", "at least",
];

const JOIN_TERMS: &[&str] = &[
    "join", "joined", "related", "with their", "along with", "together with", "for each",
];

const TEMPORAL_TERMS: &[&str] = &[
    "date", "month", "year", "recent", "latest", "oldest", "today", "week",
];

const SUMMARY_CUES: &[&str] = &[
    "explain", "meaning", "insight", "summary", "summarize", "analysis", "understand",
    "tell me about",
];

const INTERROGATIVE_STARTS: &[&str] = &[
    "what", "why", "how", "which", "who", "is ", "are ", "do ", "does ",
];

/// Analyze a question's intent. Pure function: same question in, same
/// intent out.
pub fn analyze(question: &str) -> QueryIntent {
    let lower = question.to_lowercase();

    let scores = [
        (QueryKind::Aggregate, score(&lower, AGGREGATE_TERMS)),
        (QueryKind::Filter, score(&lower, FILTER_TERMS)),
        (QueryKind::Join, score(&lower, JOIN_TERMS)),
        (QueryKind::Temporal, score(&lower, TEMPORAL_TERMS)),
    ];

    // Strictly-greater comparison: ties resolve to the earlier bucket,
    // and an all-zero scoreboard stays a plain select.
    let mut kind = QueryKind::Select;
    let mut best = 0usize;
    for (candidate, candidate_score) in scores {
        if candidate_score > best {
            kind = candidate;
            best = candidate_score;
        }
    }

    let needs_summary = SUMMARY_CUES.iter().any(|cue| lower.contains(cue))
        || INTERROGATIVE_STARTS
            .iter()
            .any(|start| lower.starts_with(start));

    QueryIntent {
        kind,
        needs_summary,
        confidence: (best as f64 / 10.0).min(1.0),
    }
}

fn score(lower: &str, terms: &[&str]) -> usize {
    terms.iter().filter(|t| lower.contains(*t)).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_listing_is_select() {
        let intent = analyze("list all customers");
        assert_eq!(intent.kind, QueryKind::Select);
        assert!(!intent.needs_summary);
        assert_eq!(intent.confidence, 0.0);
    }

    #[test]
    fn test_count_question_is_aggregate_with_summary() {
        let intent = analyze("How many orders were placed?");
        assert_eq!(intent.kind, QueryKind::Aggregate);
        assert!(intent.needs_summary);
        assert!(intent.confidence > 0.0);
    }

    #[test]
    fn test_join_phrasing_detected() {
        let intent = analyze("show customers along with their orders");
        assert_eq!(intent.kind, QueryKind::Join);
    }

    #[test]
    fn test_temporal_phrasing_detected() {
        let intent = analyze("latest sales by month");
        assert_eq!(intent.kind, QueryKind::Temporal);
    }

    #[test]
    fn test_summary_cue_without_interrogative() {
        let intent = analyze("summarize revenue per product");
        assert!(intent.needs_summary);
    }

    #[test]
    fn test_analysis_is_deterministic() {
        let question = "how many recent orders have a total greater than 100?";
        assert_eq!(analyze(question), analyze(question));
    }

    #[test]
    fn test_confidence_scales_with_keyword_hits() {
        // All nine aggregate terms present: 9 hits / 10 = 0.9.
        let question =
            "count sum average total how many maximum minimum highest lowest";
        let intent = analyze(question);
        assert_eq!(intent.kind, QueryKind::Aggregate);
        assert!((intent.confidence - 0.9).abs() < f64::EPSILON);
    }
}
