//! Confirmation Codes
//!
//! Encrypted, time-limited tokens used by confirmation and
//! password-reset flows.

pub mod cipher;
pub mod codec;

// Re-export main types
pub use cipher::{AesGcmTokenCipher, CipherError, TokenCipher};
pub use codec::ConfirmationCodec;
