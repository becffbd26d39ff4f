//! Login Repository Port
//!
//! The store is external; this crate only defines the contract. Writes
//! are last-writer-wins, serialization is the store's concern.

use async_trait::async_trait;

use crate::login::entity::UserLogin;
use crate::shared::error::Result;

#[async_trait]
pub trait LoginRepository: Send + Sync {
    async fn find_by_id(&self, id: &str) -> Result<Option<UserLogin>>;

    /// Exact, case-sensitive match.
    async fn find_by_username(&self, username: &str) -> Result<Option<UserLogin>>;

    async fn find_by_public_key(&self, public_key: &str) -> Result<Option<UserLogin>>;

    /// `None` matches records whose API key is absent.
    async fn find_by_api_key(&self, api_key: Option<&str>) -> Result<Vec<UserLogin>>;

    /// `None` matches records not bound to a person.
    async fn find_by_person(&self, person_id: Option<&str>) -> Result<Vec<UserLogin>>;

    /// Persist a new record, attributing it to `actor`.
    async fn insert(&self, login: &UserLogin, actor: Option<&str>) -> Result<()>;

    /// Persist an update, optionally attributed to `actor`.
    async fn save(&self, login: &UserLogin, actor: Option<&str>) -> Result<()>;
}
