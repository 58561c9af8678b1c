//! Observability for Tabletalk.
//!
//! Tracing subscriber setup plus the OTel GenAI attribute constants used
//! to instrument LLM calls consistently.

pub mod genai_attrs;
pub mod tracing_setup;
