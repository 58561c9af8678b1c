//! Embedded browser UI.
//!
//! GET / - A single self-contained page compiled into the binary, so the
//! server works from any working directory with no asset files on disk.

use axum::response::Html;

/// GET / - Serve the embedded single-page UI.
pub async fn index() -> Html<&'static str> {
    Html(include_str!("../assets/index.html"))
}
