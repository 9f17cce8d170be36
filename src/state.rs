use std::sync::Arc;

use crate::auth::{
    jwt::JwtKeys,
    store::{InMemoryUserStore, UserStore},
};
use crate::config::AppConfig;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub keys: JwtKeys,
    pub users: Arc<dyn UserStore>,
}

impl AppState {
    pub fn init() -> anyhow::Result<Self> {
        let config = AppConfig::from_env()?;
        tracing::info!(
            algorithm = ?config.jwt.algorithm,
            ttl_minutes = config.jwt.ttl_minutes,
            "auth settings loaded"
        );
        Ok(Self::new(config))
    }

    /// State backed by a fresh, empty in-memory user store.
    pub fn new(config: AppConfig) -> Self {
        Self::from_parts(Arc::new(config), Arc::new(InMemoryUserStore::new()))
    }

    pub fn from_parts(config: Arc<AppConfig>, users: Arc<dyn UserStore>) -> Self {
        let keys = JwtKeys::from_config(&config.jwt);
        Self {
            config,
            keys,
            users,
        }
    }
}
