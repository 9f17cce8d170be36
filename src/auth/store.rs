use std::collections::{hash_map::Entry, HashMap};

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::debug;

/// Stored user, keyed by email in the store.
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub full_name: Option<String>,
    pub password_hash: String, // Argon2 PHC string
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("user already exists")]
    AlreadyExists,
}

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Inserts `record` under `email`; fails if the key is taken.
    async fn create(&self, email: &str, record: UserRecord) -> Result<(), StoreError>;
    async fn get(&self, email: &str) -> Option<UserRecord>;
}

/// Process-lifetime store. The existence check and insert in `create` happen
/// under a single write guard.
#[derive(Debug, Default)]
pub struct InMemoryUserStore {
    users: RwLock<HashMap<String, UserRecord>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn create(&self, email: &str, record: UserRecord) -> Result<(), StoreError> {
        let mut users = self.users.write().await;
        match users.entry(email.to_string()) {
            Entry::Occupied(_) => Err(StoreError::AlreadyExists),
            Entry::Vacant(slot) => {
                slot.insert(record);
                debug!(email = %email, total = users.len(), "user stored");
                Ok(())
            }
        }
    }

    async fn get(&self, email: &str) -> Option<UserRecord> {
        self.users.read().await.get(email).cloned()
    }
}
