//! Argon2id Credential Strategy
//!
//! The shipped internal strategy: passwords are hashed with Argon2id and
//! verified locally.

use argon2::{
    password_hash::{
        rand_core::OsRng,
        PasswordHash, PasswordHasher, PasswordVerifier, SaltString,
    },
    Algorithm, Argon2, Params, Version,
};
use async_trait::async_trait;
use tracing::debug;

use crate::login::entity::UserLogin;
use crate::shared::error::{IdentityError, Result};
use crate::strategy::{AuthStrategy, ServiceKind};

/// Argon2id configuration
#[derive(Debug, Clone)]
pub struct Argon2Config {
    /// Memory cost in KiB (default: 65536 = 64 MiB)
    pub memory_cost: u32,
    /// Time cost (iterations) (default: 3)
    pub time_cost: u32,
    /// Parallelism (default: 4)
    pub parallelism: u32,
    /// Output hash length in bytes (default: 32)
    pub output_len: usize,
}

impl Default for Argon2Config {
    fn default() -> Self {
        Self {
            memory_cost: 65536, // 64 MiB
            time_cost: 3,
            parallelism: 4,
            output_len: 32,
        }
    }
}

impl Argon2Config {
    /// Low memory config for testing (faster but less secure)
    pub fn testing() -> Self {
        Self {
            memory_cost: 4096, // 4 MiB
            time_cost: 1,
            parallelism: 1,
            output_len: 32,
        }
    }

    fn to_params(&self) -> Result<Params> {
        Params::new(
            self.memory_cost,
            self.time_cost,
            self.parallelism,
            Some(self.output_len),
        )
        .map_err(|e| IdentityError::configuration(format!("invalid argon2 params: {}", e)))
    }
}

/// Internal password strategy backed by Argon2id.
pub struct Argon2Strategy {
    name: String,
    argon2: Argon2<'static>,
    active: bool,
}

impl Argon2Strategy {
    /// Registry key used unless overridden with `with_name`.
    pub const DEFAULT_NAME: &'static str = "database";

    pub fn new(config: Argon2Config) -> Result<Self> {
        let params = config.to_params()?;
        Ok(Self {
            name: Self::DEFAULT_NAME.to_string(),
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
            active: true,
        })
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }
}

#[async_trait]
impl AuthStrategy for Argon2Strategy {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> ServiceKind {
        ServiceKind::Internal
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn encode_password(&self, _login: &UserLogin, password: &str) -> Result<String> {
        let salt = SaltString::generate(&mut OsRng);

        let hash = self
            .argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| IdentityError::internal(format!("failed to hash password: {}", e)))?;

        debug!("password encoded");
        Ok(hash.to_string())
    }

    async fn authenticate(&self, login: &UserLogin, password: &str) -> Result<bool> {
        let Some(stored) = login.password.as_deref() else {
            return Ok(false);
        };

        let parsed_hash = PasswordHash::new(stored).map_err(|e| {
            IdentityError::internal(format!("invalid password hash format: {}", e))
        })?;

        match self.argon2.verify_password(password.as_bytes(), &parsed_hash) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(IdentityError::internal(format!(
                "password verification error: {}",
                e
            ))),
        }
    }
}
