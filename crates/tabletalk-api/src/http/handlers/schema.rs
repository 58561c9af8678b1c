//! Schema endpoint: the extracted catalog as JSON.
//!
//! GET /api/v1/schema - Every user table with columns, keys, and row counts.

use std::time::Instant;

use axum::extract::State;
use axum::Json;
use uuid::Uuid;

use tabletalk_core::schema::catalog::SchemaCatalog;
use tabletalk_types::schema::TableSchema;

use crate::http::error::AppError;
use crate::http::response::ApiResponse;
use crate::state::ServerState;

/// GET /api/v1/schema - List the full extracted schema.
pub async fn schema(
    State(state): State<ServerState>,
) -> Result<Json<ApiResponse<Vec<TableSchema>>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let schemas = state.app.catalog().extract_all().await?;

    let elapsed = start.elapsed().as_millis() as u64;

    let resp =
        ApiResponse::success(schemas, request_id, elapsed).with_link("self", "/api/v1/schema");

    Ok(Json(resp))
}
