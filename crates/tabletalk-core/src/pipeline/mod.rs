//! The ask pipeline for Tabletalk.
//!
//! `AskService` wires retrieval, prompt assembly, generation, execution,
//! and summarization into one linear per-request flow. The history ring
//! and summary helpers live alongside it.

pub mod history;
pub mod service;
pub mod summary;
