//! History endpoint: recent asks from the in-memory ring.
//!
//! GET /api/v1/history - Most recent questions and outcomes, newest first.

use std::time::Instant;

use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use tabletalk_types::query::HistoryEntry;

use crate::http::response::ApiResponse;
use crate::state::ServerState;

/// Query parameters for history listing.
#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    /// Cap on the number of entries returned; omitted means all retained.
    #[serde(default)]
    pub limit: Option<usize>,
}

/// GET /api/v1/history - List recent asks.
///
/// History lives in memory, so this never fails; a fresh server returns
/// an empty list.
pub async fn history(
    State(state): State<ServerState>,
    Query(query): Query<HistoryQuery>,
) -> Json<ApiResponse<Vec<HistoryEntry>>> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let entries = state.app.history.recent(query.limit);

    let elapsed = start.elapsed().as_millis() as u64;

    let resp =
        ApiResponse::success(entries, request_id, elapsed).with_link("self", "/api/v1/history");

    Json(resp)
}
