use super::{LifecyclePhase, Orchestrator};
use crate::error::{Result, SiteError};
use tracing::{error, info, warn};

impl Orchestrator {
    /// Start every handle in sequence order.
    ///
    /// The first failing enabled handle aborts startup: everything already
    /// running is stopped in reverse order and the failure is returned.
    /// Handles after the failed one are never started.
    pub async fn startup(&mut self) -> Result<()> {
        if self.phase != LifecyclePhase::Created {
            return Err(SiteError::system(format!(
                "Startup requested in phase {:?}",
                self.phase
            )));
        }

        self.phase = LifecyclePhase::Starting;
        info!("Starting {} resources", self.handles.len());

        let mut failure = None;
        for handle in self.handles.iter_mut() {
            if let Err(e) = handle.start().await {
                failure = Some(e);
                break;
            }
        }

        if let Some(e) = failure {
            error!("Startup aborted: {}", e);

            let rollback = self.teardown().await;
            if !rollback.is_clean() {
                warn!(
                    "Rollback finished with {} warning(s)",
                    rollback.warnings.len()
                );
            }

            self.phase = LifecyclePhase::Terminated;
            return Err(e);
        }

        self.phase = LifecyclePhase::Serving;
        info!("All resources started successfully");
        Ok(())
    }
}
