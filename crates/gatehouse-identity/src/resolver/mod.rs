//! Current-User Resolution
//!
//! Resolves the caller's identity from an explicit request context. An
//! impersonation token resolves through the person directory to that
//! person's impersonated login; a plain username resolves directly and
//! can enqueue a fire-and-forget activity event.

pub mod activity;

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::debug;

use crate::login::entity::{UserLogin, IMPERSONATION_PREFIX};
use crate::login::repository::LoginRepository;
use crate::shared::error::Result;

pub use activity::{ActivityConsumer, ActivityEvent, ActivityTracker};

/// A person record, as far as this crate cares about one.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    pub id: String,

    /// Login assumed when this person is impersonated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub impersonated_login_id: Option<String>,
}

/// Request-scoped identity, passed explicitly.
///
/// There is no ambient "current user": callers construct one of these
/// per request from whatever session or header material they own.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    current_username: Option<String>,
}

impl RequestContext {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn for_username(username: impl Into<String>) -> Self {
        Self {
            current_username: Some(username.into()),
        }
    }

    pub fn current_username(&self) -> Option<&str> {
        self.current_username.as_deref()
    }
}

/// Person lookup port. The directory itself is an external system.
#[async_trait]
pub trait PersonDirectory: Send + Sync {
    /// Resolve an impersonation token (the part after the sentinel
    /// prefix) to a person.
    async fn find_by_impersonation_token(&self, encrypted_key: &str) -> Result<Option<Person>>;
}

/// In-memory directory for development and tests, keyed by encrypted
/// key.
#[derive(Default)]
pub struct MemoryPersonDirectory {
    people: RwLock<HashMap<String, Person>>,
}

impl MemoryPersonDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, encrypted_key: &str, person: Person) {
        let mut people = self.people.write().await;
        people.insert(encrypted_key.to_string(), person);
    }
}

#[async_trait]
impl PersonDirectory for MemoryPersonDirectory {
    async fn find_by_impersonation_token(&self, encrypted_key: &str) -> Result<Option<Person>> {
        let people = self.people.read().await;
        Ok(people.get(encrypted_key).cloned())
    }
}

pub struct CurrentUserResolver {
    repository: Arc<dyn LoginRepository>,
    directory: Arc<dyn PersonDirectory>,
    activity: Option<ActivityTracker>,
}

impl CurrentUserResolver {
    pub fn new(
        repository: Arc<dyn LoginRepository>,
        directory: Arc<dyn PersonDirectory>,
    ) -> Self {
        Self {
            repository,
            directory,
            activity: None,
        }
    }

    /// Attach a tracker so direct resolutions can report activity.
    pub fn with_activity_tracker(mut self, tracker: ActivityTracker) -> Self {
        self.activity = Some(tracker);
        self
    }

    /// Resolve the current login from the request context.
    ///
    /// With `track_online` set, a successful direct resolution enqueues
    /// an activity event instead of writing synchronously; its ordering
    /// relative to this call is unspecified. Impersonated resolutions
    /// are never tracked.
    pub async fn current_user(
        &self,
        context: &RequestContext,
        track_online: bool,
    ) -> Result<Option<UserLogin>> {
        let Some(username) = context.current_username() else {
            return Ok(None);
        };

        if let Some(token) = username.strip_prefix(IMPERSONATION_PREFIX) {
            return self.resolve_impersonated(token).await;
        }

        let Some(login) = self.repository.find_by_username(username).await? else {
            return Ok(None);
        };

        if track_online {
            if let Some(tracker) = &self.activity {
                tracker.record(&login.id);
            }
        }
        Ok(Some(login))
    }

    async fn resolve_impersonated(&self, token: &str) -> Result<Option<UserLogin>> {
        let Some(person) = self.directory.find_by_impersonation_token(token).await? else {
            debug!("impersonation token did not resolve");
            return Ok(None);
        };

        let Some(login_id) = person.impersonated_login_id else {
            return Ok(None);
        };
        self.repository.find_by_id(&login_id).await
    }
}
