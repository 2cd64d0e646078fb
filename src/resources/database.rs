use crate::app::ConnectionPool;
use crate::config::DatabaseConfig;
use crate::error::ResourceError;
use async_trait::async_trait;
use parking_lot::RwLock;
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions};
use std::time::Duration;
use tracing::{debug, info};

/// Postgres pool shared with the route layer once created
#[derive(Default)]
pub struct DatabaseConnection {
    pool: RwLock<Option<PgPool>>,
}

impl DatabaseConnection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle to the live pool, if one has been created
    pub fn pool(&self) -> Option<PgPool> {
        self.pool.read().clone()
    }

    pub fn is_connected(&self) -> bool {
        self.pool
            .read()
            .as_ref()
            .is_some_and(|pool| !pool.is_closed())
    }
}

#[async_trait]
impl ConnectionPool for DatabaseConnection {
    type Params = DatabaseConfig;

    async fn create_pool(&self, params: &DatabaseConfig) -> Result<(), ResourceError> {
        info!(
            "Creating database pool for {}@{}:{}/{}",
            params.user, params.host, params.port, params.database
        );

        let options = PgConnectOptions::new()
            .host(&params.host)
            .port(params.port)
            .username(&params.user)
            .password(&params.password)
            .database(&params.database);

        let pool = PgPoolOptions::new()
            .max_connections(params.max_connections)
            .acquire_timeout(Duration::from_secs(30))
            .connect_with(options)
            .await?;

        info!("Database pool ready ({} connections max)", params.max_connections);
        *self.pool.write() = Some(pool);
        Ok(())
    }

    async fn close(&self) {
        let pool = self.pool.write().take();
        match pool {
            Some(pool) => {
                pool.close().await;
                info!("Database pool closed");
            }
            None => debug!("Database pool was never created"),
        }
    }
}
