//! Embedding index and retrieval for Tabletalk.
//!
//! This module defines the `Embedder` and `VectorIndex` traits that the
//! infrastructure layer implements, the `SchemaIndexer` that keeps the
//! index in sync with the live catalog, and the `Retriever` that turns a
//! question into ranked schema context.

pub mod embedder;
pub mod indexer;
pub mod retriever;
pub mod store;
