//! Refresh endpoint: re-sync the schema vector index.
//!
//! POST /api/v1/refresh - Walk the catalog and re-embed changed tables.

use std::time::Instant;

use axum::extract::State;
use axum::Json;
use tracing::Instrument;
use uuid::Uuid;

use tabletalk_observe::genai_attrs;
use tabletalk_types::retrieval::RefreshReport;

use crate::http::error::AppError;
use crate::http::response::ApiResponse;
use crate::state::ServerState;

/// POST /api/v1/refresh - Run a full index sweep.
///
/// Unchanged tables are skipped by fingerprint, so calling this
/// repeatedly is cheap. The report lists indexed, skipped, and removed
/// tables plus any per-table embedding failures.
pub async fn refresh(
    State(state): State<ServerState>,
) -> Result<Json<ApiResponse<RefreshReport>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let span = tracing::info_span!(
        "refresh",
        "gen_ai.operation.name" = genai_attrs::OP_EMBED_SCHEMA,
        "gen_ai.provider.name" = genai_attrs::PROVIDER_GEMINI,
        "gen_ai.request.model" = %state.app.config.llm.embedding_model,
    );
    let report = state.indexer.refresh().instrument(span).await?;

    let elapsed = start.elapsed().as_millis() as u64;

    let resp =
        ApiResponse::success(report, request_id, elapsed).with_link("self", "/api/v1/refresh");

    Ok(Json(resp))
}
