//! Password Policy
//!
//! Optional regex policy read from settings. With no pattern configured
//! every password is acceptable; with one, a password must match it
//! somewhere (partial match, not anchored).

use std::sync::Arc;

use regex::Regex;

use crate::settings::{keys, SettingsProvider};
use crate::shared::error::{IdentityError, Result};

pub struct PasswordRules {
    settings: Arc<dyn SettingsProvider>,
}

impl PasswordRules {
    pub fn new(settings: Arc<dyn SettingsProvider>) -> Self {
        Self { settings }
    }

    /// Check a password against the configured pattern, if any.
    ///
    /// A pattern that fails to compile is a configuration error, not a
    /// rejected password.
    pub async fn is_valid(&self, password: &str) -> Result<bool> {
        match self.settings.get_value(keys::PASSWORD_REGEX).await? {
            Some(pattern) if !pattern.is_empty() => {
                let regex = Regex::new(&pattern).map_err(|e| {
                    IdentityError::configuration(format!(
                        "invalid password policy pattern: {}",
                        e
                    ))
                })?;
                Ok(regex.is_match(password))
            }
            _ => Ok(true),
        }
    }

    /// Human-readable description of the policy, empty when none is
    /// configured.
    pub async fn friendly_rules(&self) -> Result<String> {
        Ok(self
            .settings
            .get_value(keys::PASSWORD_REGEX_FRIENDLY_DESCRIPTION)
            .await?
            .unwrap_or_default())
    }
}
