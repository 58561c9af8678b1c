//! Pipeline services and provider trait definitions for Tabletalk.
//!
//! This crate defines the "ports" (catalog, embedder, vector index, LLM
//! provider, executor traits) that the infrastructure layer implements,
//! plus the services that orchestrate them into the ask pipeline. It
//! depends only on `tabletalk-types` -- never on `tabletalk-infra` or any
//! database/IO crate.

pub mod index;
pub mod llm;
pub mod pipeline;
pub mod query;
pub mod schema;
