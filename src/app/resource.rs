use crate::error::ResourceError;
use async_trait::async_trait;
use std::sync::Arc;

/// Something a [`ResourceHandle`](super::ResourceHandle) can start and stop
#[async_trait]
pub trait Resource: Send + Sync {
    async fn start(&self) -> Result<(), ResourceError>;

    async fn stop(&self) -> Result<(), ResourceError>;
}

/// Authenticated bot session
#[async_trait]
pub trait Bot: Send + Sync {
    async fn login(&self, token: &str) -> Result<(), ResourceError>;

    async fn close(&self) -> Result<(), ResourceError>;
}

/// Factory for a shared connection pool (database, cache)
#[async_trait]
pub trait ConnectionPool: Send + Sync {
    /// Connection parameters the pool is created from
    type Params: Send + Sync;

    async fn create_pool(&self, params: &Self::Params) -> Result<(), ResourceError>;

    /// Close the pool. Closing never fails from the caller's point of view.
    async fn close(&self);
}

/// Network listener serving the site
#[async_trait]
pub trait Listener: Send + Sync {
    async fn start(&self, host: &str, port: u16) -> Result<(), ResourceError>;

    async fn stop(&self) -> Result<(), ResourceError>;
}

/// Drives a [`Bot`] with the configured token
pub struct BotResource {
    bot: Arc<dyn Bot>,
    token: String,
}

impl BotResource {
    pub fn new(bot: Arc<dyn Bot>, token: impl Into<String>) -> Self {
        Self {
            bot,
            token: token.into(),
        }
    }
}

#[async_trait]
impl Resource for BotResource {
    async fn start(&self) -> Result<(), ResourceError> {
        self.bot.login(&self.token).await
    }

    async fn stop(&self) -> Result<(), ResourceError> {
        self.bot.close().await
    }
}

/// Drives a [`ConnectionPool`] with its connection parameters
pub struct PoolResource<P: ConnectionPool> {
    pool: Arc<P>,
    params: P::Params,
}

impl<P: ConnectionPool> PoolResource<P> {
    pub fn new(pool: Arc<P>, params: P::Params) -> Self {
        Self { pool, params }
    }
}

#[async_trait]
impl<P> Resource for PoolResource<P>
where
    P: ConnectionPool + 'static,
{
    async fn start(&self) -> Result<(), ResourceError> {
        self.pool.create_pool(&self.params).await
    }

    async fn stop(&self) -> Result<(), ResourceError> {
        self.pool.close().await;
        Ok(())
    }
}

/// Drives a [`Listener`] bound to a host and port
pub struct ListenerResource {
    listener: Arc<dyn Listener>,
    host: String,
    port: u16,
}

impl ListenerResource {
    pub fn new(listener: Arc<dyn Listener>, host: impl Into<String>, port: u16) -> Self {
        Self {
            listener,
            host: host.into(),
            port,
        }
    }
}

#[async_trait]
impl Resource for ListenerResource {
    async fn start(&self) -> Result<(), ResourceError> {
        self.listener.start(&self.host, self.port).await
    }

    async fn stop(&self) -> Result<(), ResourceError> {
        self.listener.stop().await
    }
}
