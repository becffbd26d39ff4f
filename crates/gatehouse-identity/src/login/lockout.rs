//! Failed-Attempt Lockout Policy
//!
//! Reset-on-expiry counter: failures inside the window accumulate toward
//! the threshold, the first failure outside it starts a fresh window and
//! discards history. Policy parameters are read from settings on every
//! evaluation so runtime changes apply immediately.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tracing::warn;

use crate::login::entity::UserLogin;
use crate::settings::{keys, SettingsProvider};
use crate::shared::error::Result;

pub struct LockoutPolicy {
    settings: Arc<dyn SettingsProvider>,
}

impl LockoutPolicy {
    pub fn new(settings: Arc<dyn SettingsProvider>) -> Self {
        Self { settings }
    }

    /// Window length in minutes. Unset or unparseable values mean 0,
    /// which makes the window expire immediately: every failure then
    /// resets the counter and no lockout can trigger.
    async fn attempt_window_minutes(&self) -> Result<i64> {
        Ok(self
            .settings
            .get_value(keys::PASSWORD_ATTEMPT_WINDOW)
            .await?
            .and_then(|v| v.parse().ok())
            .unwrap_or(0))
    }

    /// Threshold. Unset or unparseable values mean effectively unlimited.
    async fn max_invalid_attempts(&self) -> Result<u32> {
        Ok(self
            .settings
            .get_value(keys::MAX_INVALID_PASSWORD_ATTEMPTS)
            .await?
            .and_then(|v| v.parse().ok())
            .unwrap_or(u32::MAX))
    }

    /// Record one failed authentication attempt.
    ///
    /// Mutates the record only; the lockout flag is never cleared here.
    /// Only an explicit unlock does that.
    pub async fn register_failure(&self, login: &mut UserLogin) -> Result<()> {
        let window = Duration::minutes(self.attempt_window_minutes().await?);
        let max_attempts = self.max_invalid_attempts().await?;

        let window_start = login
            .failed_window_started_at
            .unwrap_or(DateTime::<Utc>::MIN_UTC);
        let mut attempts = login.failed_attempt_count.unwrap_or(0);
        let now = Utc::now();

        // An overflowing window end is treated as still open.
        let window_end = window_start
            .checked_add_signed(window)
            .unwrap_or(DateTime::<Utc>::MAX_UTC);

        if now < window_end {
            attempts = attempts.saturating_add(1);
            if attempts >= max_attempts {
                login.is_locked_out = true;
                login.last_locked_out_at = Some(now);
                warn!(username = %login.username, attempts, "login locked out");
            }
            login.failed_attempt_count = Some(attempts);
        } else {
            login.failed_attempt_count = Some(1);
            login.failed_window_started_at = Some(now);
        }
        login.updated_at = now;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::MemorySettings;

    async fn policy_with(window: Option<&str>, max: Option<&str>) -> LockoutPolicy {
        let settings = MemorySettings::new();
        if let Some(window) = window {
            settings.set(keys::PASSWORD_ATTEMPT_WINDOW, window).await;
        }
        if let Some(max) = max {
            settings.set(keys::MAX_INVALID_PASSWORD_ATTEMPTS, max).await;
        }
        LockoutPolicy::new(Arc::new(settings))
    }

    #[tokio::test]
    async fn test_locks_exactly_on_threshold() {
        let policy = policy_with(Some("30"), Some("3")).await;
        let mut login = UserLogin::new("alice", "database");

        // first failure starts a fresh window
        policy.register_failure(&mut login).await.unwrap();
        assert_eq!(login.failed_attempt_count, Some(1));
        assert!(login.failed_window_started_at.is_some());
        assert!(!login.is_locked_out);

        policy.register_failure(&mut login).await.unwrap();
        assert_eq!(login.failed_attempt_count, Some(2));
        assert!(!login.is_locked_out);

        policy.register_failure(&mut login).await.unwrap();
        assert_eq!(login.failed_attempt_count, Some(3));
        assert!(login.is_locked_out);
        assert!(login.last_locked_out_at.is_some());
    }

    #[tokio::test]
    async fn test_expired_window_resets_counter() {
        let policy = policy_with(Some("30"), Some("3")).await;
        let mut login = UserLogin::new("alice", "database");
        login.failed_attempt_count = Some(2);
        login.failed_window_started_at = Some(Utc::now() - Duration::minutes(31));

        policy.register_failure(&mut login).await.unwrap();

        assert_eq!(login.failed_attempt_count, Some(1));
        assert!(!login.is_locked_out);
        let window_start = login.failed_window_started_at.unwrap();
        assert!(Utc::now() - window_start < Duration::minutes(1));
    }

    #[tokio::test]
    async fn test_reset_does_not_clear_lockout_flag() {
        let policy = policy_with(Some("30"), Some("3")).await;
        let mut login = UserLogin::new("alice", "database");
        login.is_locked_out = true;
        login.failed_attempt_count = Some(3);
        login.failed_window_started_at = Some(Utc::now() - Duration::minutes(45));

        policy.register_failure(&mut login).await.unwrap();

        assert_eq!(login.failed_attempt_count, Some(1));
        assert!(login.is_locked_out);
    }

    #[tokio::test]
    async fn test_zero_window_never_locks() {
        // defaults: window 0, effectively unlimited attempts
        let policy = policy_with(None, None).await;
        let mut login = UserLogin::new("alice", "database");

        for _ in 0..5 {
            policy.register_failure(&mut login).await.unwrap();
            assert_eq!(login.failed_attempt_count, Some(1));
            assert!(!login.is_locked_out);
        }
    }

    #[tokio::test]
    async fn test_unparseable_settings_fall_back_to_defaults() {
        let policy = policy_with(Some("half an hour"), Some("lots")).await;
        let mut login = UserLogin::new("alice", "database");

        policy.register_failure(&mut login).await.unwrap();

        // window parsed as 0: reset branch taken
        assert_eq!(login.failed_attempt_count, Some(1));
        assert!(!login.is_locked_out);
    }

    #[tokio::test]
    async fn test_unlimited_threshold_counts_without_locking() {
        let policy = policy_with(Some("30"), None).await;
        let mut login = UserLogin::new("alice", "database");

        for expected in 1..=10u32 {
            policy.register_failure(&mut login).await.unwrap();
            assert_eq!(login.failed_attempt_count, Some(expected));
        }
        assert!(!login.is_locked_out);
    }
}
