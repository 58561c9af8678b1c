//! LLM provider abstraction for Tabletalk.
//!
//! This module defines the `LlmProvider` trait that the infrastructure
//! layer implements for hosted text-generation backends.

pub mod provider;
