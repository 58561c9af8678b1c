//! SHA-256 content hashing for description fingerprints.
//!
//! Implements the `ContentHasher` trait from `tabletalk-core` using the
//! `sha2` crate (RustCrypto ecosystem).

use sha2::{Digest, Sha256};

use tabletalk_core::schema::hash::ContentHasher;

/// SHA-256 implementation of `ContentHasher`.
///
/// Computes lowercase hex-encoded SHA-256 digests of content strings.
/// Used to detect unchanged table descriptions during index refresh.
pub struct Sha256ContentHasher;

impl Sha256ContentHasher {
    /// Create a new hasher.
    pub fn new() -> Self {
        Self
    }
}

impl Default for Sha256ContentHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentHasher for Sha256ContentHasher {
    fn compute_hash(&self, content: &str) -> String {
        let digest = Sha256::digest(content.as_bytes());
        format!("{:x}", digest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sha256_hash_known_value() {
        let hasher = Sha256ContentHasher::new();
        // SHA-256 of empty string
        let hash = hasher.compute_hash("");
        assert_eq!(
            hash,
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_sha256_hash_deterministic() {
        let hasher = Sha256ContentHasher::new();
        let content = "Table customers contains 8 records";
        assert_eq!(hasher.compute_hash(content), hasher.compute_hash(content));
    }

    #[test]
    fn test_sha256_hash_different_content() {
        let hasher = Sha256ContentHasher::new();
        let hash1 = hasher.compute_hash("Table customers contains 8 records");
        let hash2 = hasher.compute_hash("Table customers contains 9 records");
        assert_ne!(hash1, hash2);
    }

    #[test]
    fn test_sha256_hash_is_lowercase_hex() {
        let hasher = Sha256ContentHasher::new();
        let hash = hasher.compute_hash("test");
        assert_eq!(hash.len(), 64);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
        assert!(hash.chars().all(|c| !c.is_ascii_uppercase()));
    }
}
