//! Row identifiers for cached images.

use sha2::{Digest, Sha256};

/// Compute the SQLite row key for an image key (usually its URL).
pub fn compute_cache_key(key: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(key.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_stability() {
        let hash1 = compute_cache_key("https://picsum.photos/id/1/200/300");
        let hash2 = compute_cache_key("https://picsum.photos/id/1/200/300");
        assert_eq!(hash1, hash2);
    }

    #[test]
    fn test_hash_different_keys() {
        let hash1 = compute_cache_key("https://picsum.photos/id/1/200/300");
        let hash2 = compute_cache_key("https://picsum.photos/id/2/200/300");
        assert_ne!(hash1, hash2);
    }

    #[test]
    fn test_hash_format() {
        let hash = compute_cache_key("https://picsum.photos/id/1/200/300");
        assert_eq!(hash.len(), 64);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
