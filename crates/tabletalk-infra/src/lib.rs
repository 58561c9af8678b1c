//! Infrastructure layer for Tabletalk.
//!
//! Contains implementations of the traits defined in `tabletalk-core`:
//! SQLite catalog extraction and query execution, the SQLite-backed
//! vector index, the Gemini HTTP clients, and SHA-256 hashing.

pub mod config;
pub mod hash;
pub mod llm;
pub mod secret;
pub mod sqlite;
pub mod vector;
