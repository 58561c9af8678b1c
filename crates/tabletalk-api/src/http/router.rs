//! Axum router configuration with middleware.
//!
//! API routes live under `/api/v1/`; `/` serves the embedded single-page
//! UI and `/health` answers without touching the pipeline.
//! Middleware: CORS, request tracing.

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::ServerState;

/// Build the complete router with all routes and middleware.
pub fn build_router(state: ServerState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        .route("/ask", post(handlers::ask::ask))
        .route("/refresh", post(handlers::refresh::refresh))
        .route("/schema", get(handlers::schema::schema))
        .route("/history", get(handlers::history::history));

    Router::new()
        .route("/", get(handlers::page::index))
        .nest("/api/v1", api_routes)
        .route("/health", get(health_check))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// GET /health - Simple health check endpoint.
async fn health_check() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
