//! SQLite storage layer.
//!
//! The target database (the one questions are asked about) and the
//! vector index database are separate files, each opened through a
//! split read/write pool in WAL mode. Generated SQL only ever runs on
//! a read-only connection of the target database.

pub mod catalog;
pub mod executor;
pub mod pool;
pub mod row;
pub mod seed;
