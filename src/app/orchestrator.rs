use super::handle::ResourceHandle;
use super::resource::{
    Bot, BotResource, ConnectionPool, Listener, ListenerResource, PoolResource, Resource,
};
use super::LifecyclePhase;
use crate::config::{DatabaseConfig, RedisConfig, SiteConfig};
use crate::error::{Result, SiteError};
use std::sync::Arc;

/// Main application coordinator that owns every resource handle.
///
/// The handle order is the startup order; shutdown walks it in reverse.
pub struct Orchestrator {
    pub(super) handles: Vec<ResourceHandle>,
    pub(super) phase: LifecyclePhase,
}

impl Orchestrator {
    /// Create an orchestrator over an already ordered handle sequence
    pub fn new(handles: Vec<ResourceHandle>) -> Self {
        Self {
            handles,
            phase: LifecyclePhase::Created,
        }
    }

    /// Wire the site's fixed `bot -> database -> cache -> http` sequence
    pub fn builder(config: Arc<SiteConfig>) -> OrchestratorBuilder {
        OrchestratorBuilder::new(config)
    }
}

/// Builder for the site's resource sequence
pub struct OrchestratorBuilder {
    config: Arc<SiteConfig>,
    bot: Option<Arc<dyn Bot>>,
    database: Option<Box<dyn Resource>>,
    cache: Option<Box<dyn Resource>>,
    listener: Option<Arc<dyn Listener>>,
}

impl OrchestratorBuilder {
    pub fn new(config: Arc<SiteConfig>) -> Self {
        Self {
            config,
            bot: None,
            database: None,
            cache: None,
            listener: None,
        }
    }

    /// Set the bot session
    pub fn bot<B: Bot + 'static>(mut self, bot: Arc<B>) -> Self {
        let bot: Arc<dyn Bot> = bot;
        self.bot = Some(bot);
        self
    }

    /// Set the database pool factory
    pub fn database<P>(mut self, database: Arc<P>) -> Self
    where
        P: ConnectionPool<Params = DatabaseConfig> + 'static,
    {
        let params = self.config.database.clone();
        self.database = Some(Box::new(PoolResource::new(database, params)));
        self
    }

    /// Set the cache pool factory
    pub fn cache<P>(mut self, cache: Arc<P>) -> Self
    where
        P: ConnectionPool<Params = RedisConfig> + 'static,
    {
        let params = self.config.redis.clone();
        self.cache = Some(Box::new(PoolResource::new(cache, params)));
        self
    }

    /// Set the HTTP listener
    pub fn listener<L: Listener + 'static>(mut self, listener: Arc<L>) -> Self {
        let listener: Arc<dyn Listener> = listener;
        self.listener = Some(listener);
        self
    }

    /// Build the orchestrator
    pub fn build(self) -> Result<Orchestrator> {
        let config = self.config;

        let bot = self
            .bot
            .ok_or_else(|| SiteError::system("Bot collaborator is required"))?;
        let database = self
            .database
            .ok_or_else(|| SiteError::system("Database collaborator is required"))?;
        let cache = self
            .cache
            .ok_or_else(|| SiteError::system("Cache collaborator is required"))?;
        let listener = self
            .listener
            .ok_or_else(|| SiteError::system("Listener collaborator is required"))?;

        let stop_timeout = config.lifecycle.stop_timeout();

        let handles = vec![
            ResourceHandle::new(
                "bot",
                config.bot.enabled,
                Box::new(BotResource::new(
                    bot,
                    config.authorization_tokens.bot.clone(),
                )),
            ),
            ResourceHandle::new("database", config.database.enabled, database),
            ResourceHandle::new("cache", config.redis.enabled, cache),
            // Route handlers reference the other resources, but the listener
            // only needs them attempted, not running.
            ResourceHandle::new(
                "http",
                config.server.enabled,
                Box::new(ListenerResource::new(
                    listener,
                    config.server.host.clone(),
                    config.server.port,
                )),
            ),
        ]
        .into_iter()
        .map(|handle| handle.with_stop_timeout(stop_timeout))
        .collect();

        Ok(Orchestrator::new(handles))
    }
}
