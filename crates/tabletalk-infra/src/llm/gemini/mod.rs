//! Google Gemini clients.
//!
//! Two thin HTTP clients over the Generative Language API: text
//! generation (`generateContent`) and embeddings
//! (`batchEmbedContents`). Both authenticate with the `x-goog-api-key`
//! header; the key comes from the environment and is wrapped in
//! [`secrecy::SecretString`] end to end.

pub mod client;
pub mod embedder;
pub mod types;
