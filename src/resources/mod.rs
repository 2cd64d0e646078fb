mod bot;
mod cache;
mod context;
mod database;
mod http;
#[cfg(test)]
mod tests;

pub use bot::{BotUser, DiscordBot};
pub use cache::RedisConnection;
pub use context::AppContext;
pub use database::DatabaseConnection;
pub use http::{router, HealthResponse, HttpServer};
