//! Login Service
//!
//! Credential lifecycle: creation, authentication, password changes,
//! lockout bookkeeping, unlock, and login timestamps. Password changes
//! mutate the record only; the caller owns the save.

use std::sync::Arc;

use tracing::{debug, info};

use crate::login::entity::{UserLogin, IMPERSONATION_PREFIX};
use crate::login::lockout::LockoutPolicy;
use crate::login::repository::LoginRepository;
use crate::shared::error::{IdentityError, Result};
use crate::strategy::{AuthStrategy, ServiceKind, StrategyRegistry};

/// Outcome of a username/password authentication attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthOutcome {
    Success,
    /// Unknown username or failed verification.
    InvalidCredentials,
    /// Password verified but the record awaits confirmation.
    Unconfirmed,
    /// Record is locked out; verification is skipped entirely and only
    /// an explicit unlock clears this.
    LockedOut,
}

pub struct LoginService {
    repository: Arc<dyn LoginRepository>,
    strategies: Arc<StrategyRegistry>,
    lockout: LockoutPolicy,
}

impl LoginService {
    pub fn new(
        repository: Arc<dyn LoginRepository>,
        strategies: Arc<StrategyRegistry>,
        lockout: LockoutPolicy,
    ) -> Self {
        Self {
            repository,
            strategies,
            lockout,
        }
    }

    pub async fn find_by_username(&self, username: &str) -> Result<Option<UserLogin>> {
        self.repository.find_by_username(username).await
    }

    pub async fn find_by_api_key(&self, api_key: Option<&str>) -> Result<Vec<UserLogin>> {
        self.repository.find_by_api_key(api_key).await
    }

    pub async fn find_by_person(&self, person_id: Option<&str>) -> Result<Vec<UserLogin>> {
        self.repository.find_by_person(person_id).await
    }

    /// Create a new login.
    ///
    /// The strategy name must resolve in the registry and the username
    /// must be unused. Internal strategies encode and store the password;
    /// external strategies leave it unset since the credential lives
    /// elsewhere.
    pub async fn create(
        &self,
        person_id: Option<&str>,
        strategy_name: &str,
        username: &str,
        password: &str,
        is_confirmed: bool,
        actor: Option<&str>,
    ) -> Result<UserLogin> {
        let strategy = self
            .strategies
            .resolve(strategy_name)
            .ok_or_else(|| IdentityError::not_found("AuthStrategy", strategy_name))?;

        if self.repository.find_by_username(username).await?.is_some() {
            return Err(IdentityError::duplicate_username(username));
        }

        let mut login = UserLogin::new(username, strategy_name);
        login.is_confirmed = is_confirmed;
        login.last_password_changed_at = Some(login.created_at);
        login.person_id = person_id.map(str::to_string);
        login.created_by = actor.map(str::to_string);

        if strategy.kind() == ServiceKind::Internal {
            if !strategy.is_active() {
                return Err(IdentityError::strategy_unavailable(strategy_name));
            }
            login.password = Some(strategy.encode_password(&login, password)?);
        }

        self.repository.insert(&login, actor).await?;
        info!(username = %login.username, strategy = %login.strategy, "login created");

        Ok(login)
    }

    /// Stamp the last-login time for a username.
    ///
    /// No-op for empty/whitespace usernames and for impersonation tokens,
    /// which are not real usernames.
    pub async fn update_last_login(&self, username: &str) -> Result<()> {
        if username.trim().is_empty() || username.starts_with(IMPERSONATION_PREFIX) {
            return Ok(());
        }

        if let Some(mut login) = self.repository.find_by_username(username).await? {
            login.mark_logged_in();
            self.repository.save(&login, None).await?;
        }
        Ok(())
    }

    /// Change a password after verifying the current one.
    ///
    /// Returns `Ok(false)` without touching the record when the old
    /// password does not verify.
    pub async fn change_password(
        &self,
        login: &mut UserLogin,
        old_password: &str,
        new_password: &str,
    ) -> Result<bool> {
        let strategy = self.resolve_active(login)?;
        if strategy.kind() == ServiceKind::External {
            return Err(IdentityError::unsupported(
                "cannot change password on external service type",
            ));
        }

        if !strategy.authenticate(login, old_password).await? {
            return Ok(false);
        }

        let encoded = strategy.encode_password(login, new_password)?;
        login.set_encoded_password(encoded);
        info!(username = %login.username, "password changed");
        Ok(true)
    }

    /// Administrative password change, no old-password check.
    pub async fn set_password(&self, login: &mut UserLogin, password: &str) -> Result<()> {
        let strategy = self.resolve_active(login)?;
        if strategy.kind() == ServiceKind::External {
            return Err(IdentityError::unsupported(
                "cannot change password on external service type",
            ));
        }

        let encoded = strategy.encode_password(login, password)?;
        login.set_encoded_password(encoded);
        info!(username = %login.username, "password set");
        Ok(())
    }

    /// Clear the lockout flag and persist.
    pub async fn unlock(&self, login: &mut UserLogin) -> Result<()> {
        login.clear_lockout();
        self.repository.save(login, None).await?;
        info!(username = %login.username, "login unlocked");
        Ok(())
    }

    /// Authenticate a username/password pair.
    ///
    /// A locked record short-circuits before verification: the password
    /// is never checked and the failure counters are left untouched.
    /// A failed verification runs the record through the lockout policy
    /// and persists the updated counters before reporting
    /// `InvalidCredentials`.
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<AuthOutcome> {
        let Some(mut login) = self.repository.find_by_username(username).await? else {
            debug!(username, "authentication failed: unknown username");
            return Ok(AuthOutcome::InvalidCredentials);
        };

        if login.is_locked_out {
            debug!(username = %login.username, "authentication refused: locked out");
            return Ok(AuthOutcome::LockedOut);
        }

        let strategy = self.resolve_active(&login)?;

        if strategy.authenticate(&login, password).await? {
            if !login.is_confirmed {
                return Ok(AuthOutcome::Unconfirmed);
            }
            return Ok(AuthOutcome::Success);
        }

        self.lockout.register_failure(&mut login).await?;
        self.repository.save(&login, None).await?;
        debug!(username = %login.username, "authentication failed: bad credentials");
        Ok(AuthOutcome::InvalidCredentials)
    }

    fn resolve_active(&self, login: &UserLogin) -> Result<Arc<dyn AuthStrategy>> {
        match self.strategies.resolve(&login.strategy) {
            Some(strategy) if strategy.is_active() => Ok(strategy),
            _ => Err(IdentityError::strategy_unavailable(&login.strategy)),
        }
    }
}
