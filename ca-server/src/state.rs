//! Application state

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use crate::config::{BoxError, Config};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// PostgreSQL connection pool
    pub pool: PgPool,
    /// HS256 secret for bearer tokens
    pub jwt_secret: String,
    /// CORS allow-list
    pub allowed_origins: Vec<String>,
}

impl AppState {
    /// Connect, run pending migrations and build the state
    pub async fn new(config: &Config) -> Result<Self, BoxError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.db_max_connections)
            .connect(&config.database_url)
            .await?;

        sqlx::migrate!("./migrations").run(&pool).await?;
        tracing::info!("Database migrations applied");

        Ok(Self::with_pool(pool, config))
    }

    /// Build state around an existing pool (no migrations)
    pub fn with_pool(pool: PgPool, config: &Config) -> Self {
        Self {
            pool,
            jwt_secret: config.jwt_secret.clone(),
            allowed_origins: config.allowed_origins.clone(),
        }
    }
}
