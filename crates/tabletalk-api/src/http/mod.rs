//! HTTP layer for Tabletalk.
//!
//! Axum-based API at `/api/v1/` with an envelope response format, CORS,
//! and an embedded single-page browser UI at `/`.

pub mod error;
pub mod handlers;
pub mod response;
pub mod router;
