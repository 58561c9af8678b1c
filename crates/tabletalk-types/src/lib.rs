//! Shared domain types for Tabletalk.
//!
//! This crate contains the core domain types used across the Tabletalk
//! pipeline: table schemas, SQL values, query intent, retrieval hits,
//! LLM request/response shapes, and their associated error types.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror.

pub mod config;
pub mod error;
pub mod llm;
pub mod query;
pub mod retrieval;
pub mod schema;
pub mod value;
