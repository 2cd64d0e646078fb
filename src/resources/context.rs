use super::{DatabaseConnection, DiscordBot, RedisConnection};
use crate::config::SiteConfig;
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// Collaborators handed explicitly to the route layer
#[derive(Clone)]
pub struct AppContext {
    pub config: Arc<SiteConfig>,
    pub bot: Arc<DiscordBot>,
    pub database: Arc<DatabaseConnection>,
    pub cache: Arc<RedisConnection>,
    pub debug: bool,
    pub started_at: DateTime<Utc>,
}

impl AppContext {
    pub fn new(
        config: Arc<SiteConfig>,
        bot: Arc<DiscordBot>,
        database: Arc<DatabaseConnection>,
        cache: Arc<RedisConnection>,
        debug: bool,
    ) -> Self {
        Self {
            config,
            bot,
            database,
            cache,
            debug,
            started_at: Utc::now(),
        }
    }
}
