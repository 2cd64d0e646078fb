pub mod app;
pub mod config;
pub mod error;
pub mod resources;

pub use app::{
    LifecyclePhase, Orchestrator, OrchestratorBuilder, ResourceHandle, ResourceState,
    ShutdownReason, ShutdownReport, ShutdownSignal, SignalWaiter,
};
pub use config::{ConfigOverrides, SiteConfig};
pub use error::{ResourceError, Result, SiteError};
pub use resources::{AppContext, DatabaseConnection, DiscordBot, HttpServer, RedisConnection};
