//! Identity Error Types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum IdentityError {
    #[error("Entity not found: {entity_type} with id {id}")]
    NotFound { entity_type: String, id: String },

    #[error("Username already exists: {username}")]
    DuplicateUsername { username: String },

    #[error("'{name}' authentication service does not exist, or is not active")]
    StrategyUnavailable { name: String },

    #[error("Operation not supported: {message}")]
    Unsupported { message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Store error: {message}")]
    Store { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl IdentityError {
    pub fn not_found(entity_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: entity_type.into(),
            id: id.into(),
        }
    }

    pub fn duplicate_username(username: impl Into<String>) -> Self {
        Self::DuplicateUsername { username: username.into() }
    }

    pub fn strategy_unavailable(name: impl Into<String>) -> Self {
        Self::StrategyUnavailable { name: name.into() }
    }

    pub fn unsupported(message: impl Into<String>) -> Self {
        Self::Unsupported { message: message.into() }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration { message: message.into() }
    }

    pub fn store(message: impl Into<String>) -> Self {
        Self::Store { message: message.into() }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal { message: message.into() }
    }
}

pub type Result<T> = std::result::Result<T, IdentityError>;
