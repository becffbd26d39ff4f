//! Gatehouse Common
//!
//! Shared infrastructure for the Gatehouse crates: structured logging
//! setup and opaque key generation.

pub mod keys;
pub mod logging;

pub use keys::{generate_api_key, generate_key, generate_public_key};
pub use logging::init_logging;
