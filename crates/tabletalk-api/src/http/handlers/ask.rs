//! Ask endpoint: the question-to-results pipeline over HTTP.
//!
//! POST /api/v1/ask - Answer a natural-language question with generated SQL.

use std::time::Instant;

use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use tracing::Instrument;
use uuid::Uuid;

use tabletalk_observe::genai_attrs;
use tabletalk_types::query::AskOutcome;

use crate::http::error::AppError;
use crate::http::response::ApiResponse;
use crate::state::ServerState;

/// Request body for the ask endpoint.
#[derive(Debug, Deserialize)]
pub struct AskRequest {
    /// The natural-language question.
    pub question: String,
    /// Ask the model for a prose summary even when the result is small.
    #[serde(default)]
    pub summary: bool,
}

/// POST /api/v1/ask - Run the full pipeline and return the outcome.
///
/// The outcome carries the detected intent, chosen context tables, the
/// generated SQL, the rows, and any warnings. Pipeline failures map to
/// HTTP status codes via [`AppError`].
pub async fn ask(
    State(state): State<ServerState>,
    Json(body): Json<AskRequest>,
) -> Result<Json<ApiResponse<AskOutcome>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let span = tracing::info_span!(
        "ask",
        "gen_ai.operation.name" = genai_attrs::OP_GENERATE_SQL,
        "gen_ai.provider.name" = genai_attrs::PROVIDER_GEMINI,
        "gen_ai.request.model" = %state.app.config.llm.model,
    );
    let outcome = state
        .ask_service
        .ask(&body.question, body.summary)
        .instrument(span)
        .await?;

    let elapsed = start.elapsed().as_millis() as u64;

    let resp = ApiResponse::success(outcome, request_id, elapsed).with_link("self", "/api/v1/ask");

    Ok(Json(resp))
}
