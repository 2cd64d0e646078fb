use super::signal::ShutdownSignal;
use super::{Orchestrator, ShutdownReason, ShutdownReport};
use crate::error::{Result, SiteError};
use tracing::{error, info};

impl Orchestrator {
    /// Start everything, serve until the signal fires, then tear down.
    ///
    /// Startup failures are returned before the wait is ever entered.
    pub async fn run<S: ShutdownSignal>(&mut self, signal: &mut S) -> Result<ShutdownReport> {
        self.startup().await?;

        info!("Running, waiting for shutdown signal");

        let reason = match signal.wait().await {
            Ok(reason) => reason,
            Err(e) => {
                error!("Signal handling failed: {}", e);
                ShutdownReason::Error(e.to_string())
            }
        };

        info!("Shutdown initiated: {:?}", reason);

        self.shutdown(reason)
            .await
            .ok_or_else(|| SiteError::system("Shutdown already completed"))
    }
}
