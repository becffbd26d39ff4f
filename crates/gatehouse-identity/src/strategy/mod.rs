//! Authentication Strategies
//!
//! Pluggable credential verification. Strategies are registered by name
//! and resolved per operation; login records carry the name of the
//! strategy that owns their credential.

pub mod argon2;

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use crate::login::entity::UserLogin;
use crate::shared::error::Result;

/// Where credential verification happens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceKind {
    /// Password stored and verified by this system.
    Internal,
    /// Credential delegated to an outside provider.
    External,
}

#[async_trait]
pub trait AuthStrategy: Send + Sync {
    /// Registry key for this strategy.
    fn name(&self) -> &str;

    fn kind(&self) -> ServiceKind;

    fn is_active(&self) -> bool {
        true
    }

    /// Produce the stored form of a raw password. The record is passed
    /// because some schemes bind the encoding to record identity.
    fn encode_password(&self, login: &UserLogin, password: &str) -> Result<String>;

    /// Verify a raw password against the record's stored credential.
    async fn authenticate(&self, login: &UserLogin, password: &str) -> Result<bool>;
}

/// Name-keyed strategy registry.
#[derive(Default)]
pub struct StrategyRegistry {
    strategies: HashMap<String, Arc<dyn AuthStrategy>>,
}

impl StrategyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, strategy: Arc<dyn AuthStrategy>) {
        self.strategies.insert(strategy.name().to_string(), strategy);
    }

    pub fn resolve(&self, name: &str) -> Option<Arc<dyn AuthStrategy>> {
        self.strategies.get(name).cloned()
    }

    pub fn names(&self) -> Vec<&str> {
        self.strategies.keys().map(String::as_str).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategy::argon2::{Argon2Config, Argon2Strategy};

    #[test]
    fn test_registry_resolves_by_name() {
        let mut registry = StrategyRegistry::new();
        let strategy = Argon2Strategy::new(Argon2Config::testing()).unwrap();
        registry.register(Arc::new(strategy));

        assert!(registry.resolve(Argon2Strategy::DEFAULT_NAME).is_some());
        assert!(registry.resolve("facebook").is_none());
    }

    #[test]
    fn test_registry_last_registration_wins() {
        let mut registry = StrategyRegistry::new();
        let active = Argon2Strategy::new(Argon2Config::testing()).unwrap();
        let inactive = Argon2Strategy::new(Argon2Config::testing())
            .unwrap()
            .with_active(false);

        registry.register(Arc::new(active));
        registry.register(Arc::new(inactive));

        let resolved = registry.resolve(Argon2Strategy::DEFAULT_NAME).unwrap();
        assert!(!resolved.is_active());
    }
}
