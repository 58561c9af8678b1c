//! Persistent vector index.
//!
//! Schema embeddings live in their own SQLite file, one row per table,
//! with brute-force cosine search. Table counts are small (tens, not
//! millions), so a linear scan beats carrying a vector-database
//! dependency.

pub mod store;
