//! Question analysis, prompt assembly, and SQL handling for Tabletalk.
//!
//! Everything here is deterministic glue around the LLM call: intent
//! scoring before it, prompt formatting going in, and response
//! sanitization coming out. The `QueryExecutor` trait is the seam to the
//! local database's read path.

pub mod executor;
pub mod intent;
pub mod prompt;
pub mod sanitize;
