//! Opaque Key Generation
//!
//! URL-safe random identifiers used as record keys, public lookup handles,
//! and API keys. Generated from the OS RNG and base64-encoded without
//! padding so they can travel in URLs and headers unescaped.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use rand::rngs::OsRng;
use rand::RngCore;

/// Generate a random url-safe key of `len` raw bytes.
pub fn generate_key(len: usize) -> String {
    let mut bytes = vec![0u8; len];
    OsRng.fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Public lookup handle carried inside confirmation codes (16 bytes).
pub fn generate_public_key() -> String {
    generate_key(16)
}

/// API key (32 bytes).
pub fn generate_api_key() -> String {
    generate_key(32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_are_unique() {
        let a = generate_public_key();
        let b = generate_public_key();
        assert_ne!(a, b);
    }

    #[test]
    fn test_keys_are_url_safe() {
        let key = generate_api_key();
        assert!(!key.is_empty());
        assert!(key.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }

    #[test]
    fn test_key_length_scales_with_entropy() {
        // 32 raw bytes encode longer than 16
        assert!(generate_api_key().len() > generate_public_key().len());
    }
}
