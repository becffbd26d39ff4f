//! Token Cipher
//!
//! Opaque string encryption for confirmation codes, AES-256-GCM with a
//! random nonce prefixed to the ciphertext. Failures carry no detail a
//! caller could use to distinguish why a token was rejected.

use aes_gcm::{
    aead::{Aead, KeyInit, OsRng},
    Aes256Gcm, Nonce,
};
use base64::{
    engine::general_purpose::{STANDARD as BASE64, URL_SAFE_NO_PAD},
    Engine,
};
use rand::RngCore;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CipherError {
    #[error("Invalid key: {0}")]
    InvalidKey(String),
    #[error("Encryption error: {0}")]
    Encryption(String),
    #[error("Decryption error: {0}")]
    Decryption(String),
}

pub trait TokenCipher: Send + Sync {
    fn encrypt(&self, plaintext: &str) -> Result<String, CipherError>;
    fn decrypt(&self, token: &str) -> Result<String, CipherError>;
}

/// AES-256-GCM token cipher.
pub struct AesGcmTokenCipher {
    cipher: Aes256Gcm,
}

impl AesGcmTokenCipher {
    /// The key is base64 of exactly 32 bytes, as produced by
    /// `generate_key`.
    pub fn new(encryption_key: &str) -> Result<Self, CipherError> {
        let key_bytes = BASE64
            .decode(encryption_key)
            .map_err(|e| CipherError::InvalidKey(format!("invalid base64 key: {}", e)))?;

        if key_bytes.len() != 32 {
            return Err(CipherError::InvalidKey(format!(
                "key must be 32 bytes, got {}",
                key_bytes.len()
            )));
        }

        let cipher = Aes256Gcm::new_from_slice(&key_bytes)
            .map_err(|e| CipherError::InvalidKey(e.to_string()))?;

        Ok(Self { cipher })
    }

    /// Generate a new encryption key.
    pub fn generate_key() -> String {
        let mut key = [0u8; 32];
        OsRng.fill_bytes(&mut key);
        BASE64.encode(key)
    }
}

impl TokenCipher for AesGcmTokenCipher {
    fn encrypt(&self, plaintext: &str) -> Result<String, CipherError> {
        let mut nonce_bytes = [0u8; 12];
        OsRng.fill_bytes(&mut nonce_bytes);
        let nonce = Nonce::from_slice(&nonce_bytes);

        let ciphertext = self
            .cipher
            .encrypt(nonce, plaintext.as_bytes())
            .map_err(|e| CipherError::Encryption(e.to_string()))?;

        let mut output = nonce_bytes.to_vec();
        output.extend(ciphertext);
        Ok(URL_SAFE_NO_PAD.encode(output))
    }

    fn decrypt(&self, token: &str) -> Result<String, CipherError> {
        let raw = URL_SAFE_NO_PAD
            .decode(token)
            .map_err(|e| CipherError::Decryption(e.to_string()))?;

        if raw.len() < 12 {
            return Err(CipherError::Decryption("token too short".to_string()));
        }

        let (nonce_bytes, ciphertext) = raw.split_at(12);
        let nonce = Nonce::from_slice(nonce_bytes);

        let plaintext = self
            .cipher
            .decrypt(nonce, ciphertext)
            .map_err(|e| CipherError::Decryption(e.to_string()))?;

        String::from_utf8(plaintext).map_err(|e| CipherError::Decryption(e.to_string()))
    }
}
