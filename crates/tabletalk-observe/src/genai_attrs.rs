//! OpenTelemetry GenAI Semantic Convention attribute constants.
//!
//! These follow the OTel GenAI Semantic Conventions specification for
//! consistent LLM call instrumentation across the codebase. All constants
//! are string slices usable as span attribute names and values.
//!
//! Span naming convention: `"{operation} {model}"` (e.g.,
//! `"generate_sql gemini-2.0-flash-exp"`)

// --- Required attributes ---

/// The name of the operation being performed (e.g., "generate_sql").
pub const GEN_AI_OPERATION_NAME: &str = "gen_ai.operation.name";

/// The name of the GenAI provider (e.g., "gemini").
pub const GEN_AI_PROVIDER_NAME: &str = "gen_ai.provider.name";

// --- Recommended attributes ---

/// The model ID requested (e.g., "gemini-2.0-flash-exp").
pub const GEN_AI_REQUEST_MODEL: &str = "gen_ai.request.model";

/// The sampling temperature for the request.
pub const GEN_AI_REQUEST_TEMPERATURE: &str = "gen_ai.request.temperature";

/// The number of input tokens consumed.
pub const GEN_AI_USAGE_INPUT_TOKENS: &str = "gen_ai.usage.input_tokens";

/// The number of output tokens generated.
pub const GEN_AI_USAGE_OUTPUT_TOKENS: &str = "gen_ai.usage.output_tokens";

/// The finish reasons for the response (e.g., "stop", "max_tokens").
pub const GEN_AI_RESPONSE_FINISH_REASONS: &str = "gen_ai.response.finish_reasons";

// --- Operation name values ---

/// SQL generation from a natural-language question.
pub const OP_GENERATE_SQL: &str = "generate_sql";

/// Plain-language summarization of query results.
pub const OP_SUMMARIZE_RESULTS: &str = "summarize_results";

/// Embedding table descriptions (or questions) for retrieval.
pub const OP_EMBED_SCHEMA: &str = "embed_schema";

// --- Provider name values ---

/// Google Gemini provider identifier.
pub const PROVIDER_GEMINI: &str = "gemini";
