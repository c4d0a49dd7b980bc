/// Application context and dependency injection
use crate::{
    account::{Authenticator, SqliteAccountStore},
    auth::TokenKeys,
    catalog::{ProductManager, PromotionManager},
    config::ServerConfig,
    db,
    error::AppResult,
    purchases::PurchaseManager,
};
use sqlx::SqlitePool;
use std::sync::Arc;
use std::time::Instant;

/// Application context holding all shared services
#[derive(Clone)]
pub struct AppContext {
    pub config: Arc<ServerConfig>,
    pub db: SqlitePool,
    pub tokens: Arc<TokenKeys>,
    pub authenticator: Arc<Authenticator>,
    pub accounts: Arc<SqliteAccountStore>,
    pub products: Arc<ProductManager>,
    pub promotions: Arc<PromotionManager>,
    pub purchases: Arc<PurchaseManager>,
    pub started_at: Instant,
}

impl AppContext {
    /// Create a new application context from configuration
    pub async fn new(config: ServerConfig) -> AppResult<Self> {
        config.validate()?;

        let db = db::create_pool(
            &config.storage.database_path,
            db::DatabaseOptions {
                max_connections: config.storage.max_connections,
                ..Default::default()
            },
        )
        .await?;

        Self::assemble(config, db).await
    }

    /// Build the context over an existing pool, running migrations first
    pub async fn from_pool(config: ServerConfig, db: SqlitePool) -> AppResult<Self> {
        config.validate()?;
        Self::assemble(config, db).await
    }

    /// Wire services over a pool; callers validate `config` first
    async fn assemble(config: ServerConfig, db: SqlitePool) -> AppResult<Self> {
        db::run_migrations(&db).await?;
        db::test_connection(&db).await?;

        let tokens = Arc::new(TokenKeys::new(&config.authentication.jwt_secret));
        let accounts = Arc::new(SqliteAccountStore::new(db.clone()));
        let authenticator = Arc::new(Authenticator::new(accounts.clone(), tokens.clone()));

        tracing::info!(
            database = %config.storage.database_path.display(),
            "Application context ready"
        );

        Ok(Self {
            config: Arc::new(config),
            products: Arc::new(ProductManager::new(db.clone())),
            promotions: Arc::new(PromotionManager::new(db.clone())),
            purchases: Arc::new(PurchaseManager::new(db.clone())),
            db,
            tokens,
            authenticator,
            accounts,
            started_at: Instant::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AuthConfig, LogFormat, LoggingConfig, ServiceConfig, StorageConfig};
    use crate::error::AppError;
    use std::path::PathBuf;

    fn config_with_secret(secret: &str) -> ServerConfig {
        ServerConfig {
            service: ServiceConfig {
                hostname: "127.0.0.1".to_string(),
                port: 0,
                cors_origins: vec![],
            },
            storage: StorageConfig {
                database_path: PathBuf::from(":memory:"),
                max_connections: 1,
            },
            authentication: AuthConfig {
                jwt_secret: secret.to_string(),
            },
            logging: LoggingConfig {
                level: "debug".to_string(),
                format: LogFormat::Pretty,
            },
        }
    }

    #[tokio::test]
    async fn test_from_pool_rejects_invalid_config() {
        let pool = db::create_memory_pool().await.unwrap();
        let result = AppContext::from_pool(config_with_secret("short"), pool).await;
        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[tokio::test]
    async fn test_from_pool_builds_services() {
        let pool = db::create_memory_pool().await.unwrap();
        let ctx = AppContext::from_pool(
            config_with_secret("context-test-secret-0123456789abcdef"),
            pool,
        )
        .await
        .unwrap();

        assert!(ctx.accounts.list().await.unwrap().is_empty());
    }
}
