use super::resource::Resource;
use super::ResourceState;
use crate::error::{Result, SiteError};
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, error, info, warn};

/// State-tracking wrapper around one external resource.
///
/// `start` and `stop` are idempotent: a disabled handle never leaves
/// `NotStarted`, and `stop` only acts on a `Running` handle.
pub struct ResourceHandle {
    name: String,
    enabled: bool,
    state: ResourceState,
    resource: Box<dyn Resource>,
    stop_timeout: Option<Duration>,
}

impl ResourceHandle {
    pub fn new(name: impl Into<String>, enabled: bool, resource: Box<dyn Resource>) -> Self {
        Self {
            name: name.into(),
            enabled,
            state: ResourceState::NotStarted,
            resource,
            stop_timeout: None,
        }
    }

    /// Bound the stop procedure; an elapsed stop is reported as a warning
    pub fn with_stop_timeout(mut self, stop_timeout: Duration) -> Self {
        self.stop_timeout = Some(stop_timeout);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn state(&self) -> ResourceState {
        self.state
    }

    /// Start the wrapped resource. Failures are not retried.
    pub async fn start(&mut self) -> Result<()> {
        if !self.enabled {
            info!("{} is disabled, skipping", self.name);
            return Ok(());
        }

        if self.state != ResourceState::NotStarted {
            debug!(
                "{} already in state {:?}, ignoring start",
                self.name, self.state
            );
            return Ok(());
        }

        self.set_state(ResourceState::Starting);
        info!("Starting {}", self.name);

        match self.resource.start().await {
            Ok(()) => {
                self.set_state(ResourceState::Running);
                info!("{} started successfully", self.name);
                Ok(())
            }
            Err(e) => {
                self.set_state(ResourceState::Failed);
                error!("Failed to start {}: {}", self.name, e);
                Err(SiteError::StartupFailure {
                    resource: self.name.clone(),
                    source: e,
                })
            }
        }
    }

    /// Stop the wrapped resource.
    ///
    /// The handle always ends in `Stopped`; a failing or timed out stop
    /// procedure comes back as a `ShutdownWarning`.
    pub async fn stop(&mut self) -> Result<()> {
        if !self.enabled || self.state != ResourceState::Running {
            debug!("{} in state {:?}, nothing to stop", self.name, self.state);
            return Ok(());
        }

        self.set_state(ResourceState::Stopping);
        info!("Closing {}", self.name);

        let outcome = match self.stop_timeout {
            Some(limit) => match timeout(limit, self.resource.stop()).await {
                Ok(result) => result.map_err(|e| e.to_string()),
                Err(_) => Err(format!("stop timed out after {:?}", limit)),
            },
            None => self.resource.stop().await.map_err(|e| e.to_string()),
        };

        self.set_state(ResourceState::Stopped);

        match outcome {
            Ok(()) => {
                info!("{} stopped", self.name);
                Ok(())
            }
            Err(message) => {
                warn!("Error stopping {}: {}", self.name, message);
                Err(SiteError::shutdown_warning(self.name.clone(), message))
            }
        }
    }

    fn set_state(&mut self, state: ResourceState) {
        debug!("Resource '{}' state changed to: {:?}", self.name, state);
        self.state = state;
    }
}
