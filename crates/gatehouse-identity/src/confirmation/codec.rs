//! Confirmation Code Codec
//!
//! Encodes and decodes encrypted confirmation codes. The payload is
//! `ROCK|{publicKey}|{username}|{unixSeconds}`; the encrypted form is
//! opaque to callers and valid for one hour (checked by whole-hour
//! truncation, so real tolerance runs to just under two).

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::confirmation::cipher::TokenCipher;
use crate::login::entity::UserLogin;
use crate::login::repository::LoginRepository;
use crate::shared::error::{IdentityError, Result};

/// Leading marker inside the decrypted payload.
pub const CODE_PREFIX: &str = "ROCK|";

pub struct ConfirmationCodec {
    cipher: Arc<dyn TokenCipher>,
    repository: Arc<dyn LoginRepository>,
}

impl ConfirmationCodec {
    pub fn new(cipher: Arc<dyn TokenCipher>, repository: Arc<dyn LoginRepository>) -> Self {
        Self { cipher, repository }
    }

    /// Issue a confirmation code for a login, stamped with the current
    /// time.
    pub fn issue(&self, login: &UserLogin) -> Result<String> {
        let identifier = format!(
            "{}{}|{}|{}",
            CODE_PREFIX,
            login.public_key,
            login.username,
            Utc::now().timestamp()
        );

        self.cipher.encrypt(&identifier).map_err(|e| {
            IdentityError::internal(format!("failed to encrypt confirmation code: {}", e))
        })
    }

    /// Resolve a confirmation code back to its login.
    ///
    /// Every invalid token resolves to `None`: expired, tampered,
    /// malformed, and unknown codes are indistinguishable to the caller.
    pub async fn decode(&self, code: &str) -> Result<Option<UserLogin>> {
        if code.is_empty() {
            return Ok(None);
        }

        // A failed decrypt is treated as an empty identifier, not an error.
        let identifier = self.cipher.decrypt(code).unwrap_or_default();
        if !identifier.starts_with(CODE_PREFIX) {
            return Ok(None);
        }

        let parts: Vec<&str> = identifier.split('|').collect();
        if parts.len() != 4 {
            return Ok(None);
        }
        let public_key = parts[1];
        let username = parts[2];

        // Unparseable timestamps fall back to the epoch and fail below.
        let issued_seconds: i64 = parts[3].parse().unwrap_or(0);
        let issued_at = DateTime::<Utc>::from_timestamp(issued_seconds, 0)
            .unwrap_or(DateTime::<Utc>::UNIX_EPOCH);

        // Codes are only valid for an hour
        if (Utc::now() - issued_at).num_hours() > 1 {
            debug!("confirmation code expired");
            return Ok(None);
        }

        match self.repository.find_by_public_key(public_key).await? {
            Some(login) if login.username == username => Ok(Some(login)),
            _ => Ok(None),
        }
    }
}
