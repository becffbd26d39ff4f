//! Shared Infrastructure

pub mod error;

pub use error::{IdentityError, Result};
