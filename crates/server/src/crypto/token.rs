//! Verification token generation and digesting.
//!
//! The raw token goes out by email; only its SHA-256 digest is stored.

use rand::RngCore;
use sha2::{Digest, Sha256};

/// Random bytes per token (hex-encoded to 64 characters).
const TOKEN_BYTES: usize = 32;

/// Generate a new random verification token as lowercase hex.
pub fn generate_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Deterministic one-way digest of a raw token, as lowercase hex.
pub fn digest_token(raw_token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(raw_token.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_format() {
        let token = generate_token();
        assert_eq!(token.len(), TOKEN_BYTES * 2);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_tokens_are_unique() {
        use std::collections::HashSet;
        let tokens: HashSet<String> = (0..50).map(|_| generate_token()).collect();
        assert_eq!(tokens.len(), 50);
    }

    #[test]
    fn test_digest_is_deterministic_sha256() {
        assert_eq!(
            digest_token("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
        assert_eq!(digest_token("abc"), digest_token("abc"));
        assert_ne!(digest_token("abc"), digest_token("abd"));
    }
}
