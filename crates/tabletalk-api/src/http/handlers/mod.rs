//! HTTP request handlers.

pub mod ask;
pub mod history;
pub mod page;
pub mod refresh;
pub mod schema;
