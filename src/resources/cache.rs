use crate::app::ConnectionPool;
use crate::config::RedisConfig;
use crate::error::ResourceError;
use async_trait::async_trait;
use parking_lot::RwLock;
use redis::aio::ConnectionManager;
use redis::Client;
use tracing::{debug, info};

/// Redis connection manager shared with the route layer once created
#[derive(Default)]
pub struct RedisConnection {
    manager: RwLock<Option<ConnectionManager>>,
}

impl RedisConnection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle to the live connection manager, if one has been created
    pub fn connection(&self) -> Option<ConnectionManager> {
        self.manager.read().clone()
    }

    pub fn is_connected(&self) -> bool {
        self.manager.read().is_some()
    }
}

#[async_trait]
impl ConnectionPool for RedisConnection {
    type Params = RedisConfig;

    async fn create_pool(&self, params: &RedisConfig) -> Result<(), ResourceError> {
        info!(
            "Creating redis pool for {}:{}/{}",
            params.host, params.port, params.db
        );

        let client = Client::open(params.connection_url())?;
        let mut manager = ConnectionManager::new(client).await?;

        let pong: String = redis::cmd("PING").query_async(&mut manager).await?;
        debug!("Redis answered {}", pong);

        *self.manager.write() = Some(manager);
        info!("Redis pool ready");
        Ok(())
    }

    async fn close(&self) {
        // Dropping the last manager clone closes the multiplexed connection
        let manager = self.manager.write().take();
        match manager {
            Some(_) => info!("Redis pool closed"),
            None => debug!("Redis pool was never created"),
        }
    }
}
