//! Application error type mapping pipeline failures to HTTP responses.
//!
//! The mapping preserves the failure-class split: provider-side failures
//! (auth, rate limit, overload) surface as 5xx/429 gateway-style codes,
//! while SQL the database rejected is a 422 with the database's message.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use tabletalk_core::index::indexer::RefreshError;
use tabletalk_core::index::retriever::RetrieveError;
use tabletalk_core::pipeline::service::AskError;
use tabletalk_types::error::{CatalogError, LlmError, QueryError};

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// Pipeline failures from `POST /api/v1/ask`.
    Ask(AskError),
    /// Sweep failures from `POST /api/v1/refresh`.
    Refresh(RefreshError),
    /// Catalog extraction failures.
    Catalog(CatalogError),
    /// Request validation error.
    Validation(String),
}

impl From<AskError> for AppError {
    fn from(e: AskError) -> Self {
        AppError::Ask(e)
    }
}

impl From<RefreshError> for AppError {
    fn from(e: RefreshError) -> Self {
        AppError::Refresh(e)
    }
}

impl From<CatalogError> for AppError {
    fn from(e: CatalogError) -> Self {
        AppError::Catalog(e)
    }
}

/// Status/code/message for a provider-side failure, shared between the
/// generation and embedding paths.
fn llm_error(e: &LlmError) -> (StatusCode, &'static str, String) {
    match e {
        LlmError::AuthenticationFailed => (
            StatusCode::BAD_GATEWAY,
            "PROVIDER_AUTH",
            "The model provider rejected the API key".to_string(),
        ),
        LlmError::RateLimited { .. } => (
            StatusCode::TOO_MANY_REQUESTS,
            "RATE_LIMITED",
            "The model provider rate limited this request".to_string(),
        ),
        LlmError::Overloaded(_) => (
            StatusCode::SERVICE_UNAVAILABLE,
            "PROVIDER_OVERLOADED",
            "The model provider is temporarily overloaded".to_string(),
        ),
        other => (StatusCode::BAD_GATEWAY, "PROVIDER_ERROR", other.to_string()),
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Ask(AskError::EmptyQuestion) => (
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
                "Question must not be empty".to_string(),
            ),
            AppError::Ask(AskError::Query(QueryError::ExecutionFailed(msg))) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "QUERY_FAILED",
                format!("The generated query could not run: {msg}"),
            ),
            AppError::Ask(AskError::Query(e)) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "QUERY_FAILED",
                e.to_string(),
            ),
            AppError::Ask(AskError::Generation(e)) => llm_error(e),
            AppError::Ask(AskError::Retrieval(RetrieveError::Embedding(e))) => llm_error(e),
            AppError::Ask(AskError::Retrieval(RetrieveError::Index(e))) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INDEX_ERROR",
                e.to_string(),
            ),
            AppError::Refresh(RefreshError::Catalog(e)) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "CATALOG_ERROR",
                e.to_string(),
            ),
            AppError::Refresh(RefreshError::Index(e)) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INDEX_ERROR",
                e.to_string(),
            ),
            AppError::Catalog(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "CATALOG_ERROR",
                e.to_string(),
            ),
            AppError::Validation(msg) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
            }
        };

        let body = json!({
            "data": null,
            "meta": {
                "request_id": "",
                "timestamp": chrono::Utc::now().to_rfc3339(),
                "response_time_ms": 0
            },
            "errors": [{
                "code": code,
                "message": message,
            }]
        });

        (
            status,
            [(axum::http::header::CONTENT_TYPE, "application/json")],
            body.to_string(),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_question_maps_to_bad_request() {
        let response = AppError::Ask(AskError::EmptyQuestion).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_failed_sql_maps_to_unprocessable() {
        let err = AppError::Ask(AskError::Query(QueryError::ExecutionFailed(
            "no such table: basket".to_string(),
        )));
        assert_eq!(err.into_response().status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn test_rejected_statement_maps_to_unprocessable() {
        let err = AppError::Ask(AskError::Query(QueryError::RejectedStatement(
            "DROP".to_string(),
        )));
        assert_eq!(err.into_response().status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn test_rate_limit_maps_to_429_for_both_paths() {
        let generation = AppError::Ask(AskError::Generation(LlmError::RateLimited {
            retry_after_ms: Some(2_000),
        }));
        assert_eq!(
            generation.into_response().status(),
            StatusCode::TOO_MANY_REQUESTS
        );

        let embedding = AppError::Ask(AskError::Retrieval(RetrieveError::Embedding(
            LlmError::RateLimited {
                retry_after_ms: None,
            },
        )));
        assert_eq!(
            embedding.into_response().status(),
            StatusCode::TOO_MANY_REQUESTS
        );
    }

    #[test]
    fn test_network_failure_maps_to_bad_gateway() {
        let err = AppError::Ask(AskError::Generation(LlmError::Network(
            "connection reset".to_string(),
        )));
        assert_eq!(err.into_response().status(), StatusCode::BAD_GATEWAY);
    }
}
