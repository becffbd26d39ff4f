//! In-Memory Login Repository
//!
//! HashMap-backed adapter for development and tests. Stores verbatim
//! clones; all timestamp stamping happens on the entity before the call.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use crate::login::entity::UserLogin;
use crate::login::repository::LoginRepository;
use crate::shared::error::{IdentityError, Result};

#[derive(Default)]
pub struct MemoryLoginRepository {
    records: Arc<RwLock<HashMap<String, UserLogin>>>,
}

impl MemoryLoginRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl LoginRepository for MemoryLoginRepository {
    async fn find_by_id(&self, id: &str) -> Result<Option<UserLogin>> {
        let records = self.records.read().await;
        Ok(records.get(id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<UserLogin>> {
        let records = self.records.read().await;
        Ok(records.values().find(|r| r.username == username).cloned())
    }

    async fn find_by_public_key(&self, public_key: &str) -> Result<Option<UserLogin>> {
        let records = self.records.read().await;
        Ok(records.values().find(|r| r.public_key == public_key).cloned())
    }

    async fn find_by_api_key(&self, api_key: Option<&str>) -> Result<Vec<UserLogin>> {
        let records = self.records.read().await;
        Ok(records
            .values()
            .filter(|r| r.api_key.as_deref() == api_key)
            .cloned()
            .collect())
    }

    async fn find_by_person(&self, person_id: Option<&str>) -> Result<Vec<UserLogin>> {
        let records = self.records.read().await;
        Ok(records
            .values()
            .filter(|r| r.person_id.as_deref() == person_id)
            .cloned()
            .collect())
    }

    async fn insert(&self, login: &UserLogin, actor: Option<&str>) -> Result<()> {
        let mut records = self.records.write().await;
        if records.contains_key(&login.id) {
            return Err(IdentityError::store(format!(
                "duplicate login id: {}",
                login.id
            )));
        }
        debug!(username = %login.username, actor = ?actor, "login inserted");
        records.insert(login.id.clone(), login.clone());
        Ok(())
    }

    async fn save(&self, login: &UserLogin, actor: Option<&str>) -> Result<()> {
        let mut records = self.records.write().await;
        debug!(username = %login.username, actor = ?actor, "login saved");
        records.insert(login.id.clone(), login.clone());
        Ok(())
    }
}
