//! User Login Entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Sentinel prefix marking an impersonation token instead of a username.
pub const IMPERSONATION_PREFIX: &str = "rckipid=";

/// A credential record, optionally bound to a person.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserLogin {
    pub id: String,

    /// Opaque lookup handle carried inside confirmation codes.
    /// Never exposes the record id.
    pub public_key: String,

    /// Unique, matched case-sensitively.
    pub username: String,

    /// Encoded credential. Unset for externally-delegated strategies.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    #[serde(default)]
    pub is_confirmed: bool,

    /// Authentication strategy name (registry key).
    pub strategy: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub person_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(default)]
    pub is_locked_out: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_locked_out_at: Option<DateTime<Utc>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub failed_attempt_count: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub failed_window_started_at: Option<DateTime<Utc>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_password_changed_at: Option<DateTime<Utc>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_login_at: Option<DateTime<Utc>>,

    /// Stamped asynchronously by the activity consumer.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_activity_at: Option<DateTime<Utc>>,

    /// Audit fields
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
}

impl UserLogin {
    /// Create a new login record for the given strategy.
    pub fn new(username: impl Into<String>, strategy: impl Into<String>) -> Self {
        let now = Utc::now();

        Self {
            id: uuid::Uuid::new_v4().to_string(),
            public_key: gatehouse_common::keys::generate_public_key(),
            username: username.into(),
            password: None,
            is_confirmed: false,
            strategy: strategy.into(),
            person_id: None,
            api_key: None,
            is_locked_out: false,
            last_locked_out_at: None,
            failed_attempt_count: None,
            failed_window_started_at: None,
            last_password_changed_at: None,
            last_login_at: None,
            last_activity_at: None,
            created_at: now,
            updated_at: now,
            created_by: None,
        }
    }

    pub fn with_person(mut self, person_id: impl Into<String>) -> Self {
        self.person_id = Some(person_id.into());
        self
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Store an already-encoded credential and stamp the change time.
    pub fn set_encoded_password(&mut self, encoded: impl Into<String>) {
        let now = Utc::now();
        self.password = Some(encoded.into());
        self.last_password_changed_at = Some(now);
        self.updated_at = now;
    }

    /// Stamp the last successful login.
    pub fn mark_logged_in(&mut self) {
        let now = Utc::now();
        self.last_login_at = Some(now);
        self.updated_at = now;
    }

    /// Stamp the last observed activity.
    pub fn mark_seen(&mut self, at: DateTime<Utc>) {
        self.last_activity_at = Some(at);
        self.updated_at = Utc::now();
    }

    /// Clear the lockout flag. Failure counters are left intact; the
    /// policy resets them on the next out-of-window attempt.
    pub fn clear_lockout(&mut self) {
        self.is_locked_out = false;
        self.updated_at = Utc::now();
    }

    pub fn is_impersonation_token(value: &str) -> bool {
        value.starts_with(IMPERSONATION_PREFIX)
    }
}
