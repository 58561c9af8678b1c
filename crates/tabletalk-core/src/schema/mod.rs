//! Schema extraction and description generation for Tabletalk.
//!
//! This module defines the `SchemaCatalog` trait that the infrastructure
//! layer implements over the local database's catalog, the `ContentHasher`
//! trait used to fingerprint descriptions, and the deterministic
//! description generator that turns extracted metadata into text.

pub mod catalog;
pub mod describe;
pub mod hash;
