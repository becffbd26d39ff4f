//! Runtime Settings
//!
//! Read-only key/value lookup for policy parameters. The store itself is
//! external; adapters here cover development (in-memory) and environment
//! variables.

use std::collections::HashMap;
use std::env;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::shared::error::Result;

/// Setting keys read by this crate.
pub mod keys {
    /// Lockout window length in minutes.
    pub const PASSWORD_ATTEMPT_WINDOW: &str = "PasswordAttemptWindow";
    /// Failed attempts tolerated inside the window.
    pub const MAX_INVALID_PASSWORD_ATTEMPTS: &str = "MaxInvalidPasswordAttempts";
    /// Pattern every new password must match.
    pub const PASSWORD_REGEX: &str = "PasswordRegex";
    /// Human-readable description of the pattern.
    pub const PASSWORD_REGEX_FRIENDLY_DESCRIPTION: &str = "PasswordRegexFriendlyDescription";
}

#[async_trait]
pub trait SettingsProvider: Send + Sync {
    /// Look up a setting. An absent key is `None`, not an error.
    async fn get_value(&self, key: &str) -> Result<Option<String>>;
}

/// Mutable in-memory settings for development and tests.
#[derive(Default)]
pub struct MemorySettings {
    values: RwLock<HashMap<String, String>>,
}

impl MemorySettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn set(&self, key: &str, value: &str) {
        let mut values = self.values.write().await;
        values.insert(key.to_string(), value.to_string());
    }

    pub async fn unset(&self, key: &str) {
        let mut values = self.values.write().await;
        values.remove(key);
    }
}

#[async_trait]
impl SettingsProvider for MemorySettings {
    async fn get_value(&self, key: &str) -> Result<Option<String>> {
        let values = self.values.read().await;
        Ok(values.get(key).cloned())
    }
}

/// Environment variable settings provider.
pub struct EnvSettings {
    prefix: String,
}

impl EnvSettings {
    pub fn new() -> Self {
        Self { prefix: "GATEHOUSE_SETTING_".to_string() }
    }

    pub fn with_prefix(prefix: &str) -> Self {
        Self { prefix: prefix.to_string() }
    }

    fn env_key(&self, key: &str) -> String {
        format!("{}{}", self.prefix, key.to_uppercase().replace("-", "_").replace(".", "_"))
    }
}

impl Default for EnvSettings {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SettingsProvider for EnvSettings {
    async fn get_value(&self, key: &str) -> Result<Option<String>> {
        Ok(env::var(self.env_key(key)).ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_settings_roundtrip() {
        let settings = MemorySettings::new();
        assert!(settings.get_value(keys::PASSWORD_REGEX).await.unwrap().is_none());

        settings.set(keys::PASSWORD_REGEX, r"\d").await;
        assert_eq!(
            settings.get_value(keys::PASSWORD_REGEX).await.unwrap().as_deref(),
            Some(r"\d")
        );

        settings.unset(keys::PASSWORD_REGEX).await;
        assert!(settings.get_value(keys::PASSWORD_REGEX).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_env_settings_prefixing() {
        let settings = EnvSettings::with_prefix("GATEHOUSE_TEST_A_");
        assert_eq!(settings.env_key("PasswordRegex"), "GATEHOUSE_TEST_A_PASSWORDREGEX");

        env::set_var("GATEHOUSE_TEST_A_PASSWORDREGEX", "[a-z]+");
        assert_eq!(
            settings.get_value("PasswordRegex").await.unwrap().as_deref(),
            Some("[a-z]+")
        );
        env::remove_var("GATEHOUSE_TEST_A_PASSWORDREGEX");

        assert!(settings.get_value("PasswordRegex").await.unwrap().is_none());
    }
}
