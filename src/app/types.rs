use crate::error::SiteError;

/// Lifecycle state of a single resource handle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceState {
    NotStarted,
    Starting,
    Running,
    Stopping,
    Stopped,
    Failed,
}

/// Where the orchestrator is in its own run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecyclePhase {
    Created,
    Starting,
    Serving,
    ShuttingDown,
    Terminated,
}

/// System shutdown reason
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShutdownReason {
    Signal(String),
    Error(String),
}

/// Outcome of a reverse-order teardown
#[derive(Debug, Default)]
pub struct ShutdownReport {
    pub reason: Option<ShutdownReason>,
    /// Every handle visited, in visit order
    pub visited: Vec<String>,
    /// Handles that left `Running` during this teardown
    pub stopped: Vec<String>,
    /// Stop failures; logged, never fatal
    pub warnings: Vec<SiteError>,
}

impl ShutdownReport {
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }
}
