use crate::config::AppConfig;
use crate::database::{
    ContactRepository, MemoryContactRepository, MemoryUserRepository, MongoContactRepository, MongoDB,
    MongoUserRepository, UserRepository,
};
use crate::services::auth_service::TokenKeys;
use std::error::Error;
use std::sync::Arc;

/// Everything a request handler needs, built once in `main` and shared
/// through `web::Data<AppState>`.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub contacts: Arc<dyn ContactRepository>,
    pub tokens: Arc<TokenKeys>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        users: Arc<dyn UserRepository>,
        contacts: Arc<dyn ContactRepository>,
    ) -> Self {
        let tokens = TokenKeys::new(&config.token_secret, config.token_ttl_minutes);
        Self {
            users,
            contacts,
            tokens: Arc::new(tokens),
            config: Arc::new(config),
        }
    }

    /// Opens the storage backend named by `config.database_url`.
    pub async fn connect(config: AppConfig) -> Result<Self, Box<dyn Error>> {
        if config.uses_memory_store() {
            log::warn!("⚠️  Using in-memory storage, data will not survive a restart");
            return Ok(Self::in_memory(config));
        }

        let db = MongoDB::new(&config.database_url).await?;
        let users = Arc::new(MongoUserRepository::new(&db));
        let contacts = Arc::new(MongoContactRepository::new(&db));

        Ok(Self::new(config, users, contacts))
    }

    pub fn in_memory(config: AppConfig) -> Self {
        Self::new(
            config,
            Arc::new(MemoryUserRepository::new()),
            Arc::new(MemoryContactRepository::new()),
        )
    }

    pub fn storage_backend(&self) -> &'static str {
        if self.config.uses_memory_store() {
            "memory"
        } else {
            "mongodb"
        }
    }
}

#[cfg(test)]
pub mod test_support {
    use super::*;

    pub const TEST_SECRET: &str = "test-secret";

    pub fn test_config() -> AppConfig {
        AppConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            database_url: "memory://".to_string(),
            token_secret: TEST_SECRET.to_string(),
            token_ttl_minutes: crate::config::DEFAULT_TOKEN_TTL_MINUTES,
            expose_error_details: false,
            cors_allowed_origins: vec![],
        }
    }

    pub fn test_state() -> AppState {
        AppState::in_memory(test_config())
    }
}
