//! ContentHasher trait for fingerprinting schema descriptions.
//!
//! Defined in tabletalk-core so the indexer can detect unchanged
//! descriptions without coupling to a specific hashing algorithm. The
//! `Sha256ContentHasher` adapter lives in tabletalk-infra.

/// Abstraction over content hashing for description fingerprints.
///
/// Used by the indexer to skip re-embedding tables whose descriptions
/// have not changed since the last refresh.
pub trait ContentHasher: Send + Sync {
    /// Compute a hex-encoded hash of the given content.
    fn compute_hash(&self, content: &str) -> String;
}
