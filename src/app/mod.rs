mod handle;
mod orchestrator;
mod resource;
mod runtime;
mod shutdown;
mod signal;
mod startup;
mod state;
mod types;


pub use handle::ResourceHandle;
pub use orchestrator::{Orchestrator, OrchestratorBuilder};
pub use resource::{
    Bot, BotResource, ConnectionPool, Listener, ListenerResource, PoolResource, Resource,
};
pub use signal::{ShutdownSignal, SignalWaiter};
pub use types::{LifecyclePhase, ResourceState, ShutdownReason, ShutdownReport};
