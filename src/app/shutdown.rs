use super::{LifecyclePhase, Orchestrator, ResourceState, ShutdownReason, ShutdownReport};
use tracing::{debug, info};

impl Orchestrator {
    /// Perform graceful shutdown of all resources.
    ///
    /// Runs at most once. Later calls, including ones made while a shutdown
    /// is in progress, are ignored and return `None`.
    pub async fn shutdown(&mut self, reason: ShutdownReason) -> Option<ShutdownReport> {
        if matches!(
            self.phase,
            LifecyclePhase::ShuttingDown | LifecyclePhase::Terminated
        ) {
            debug!("Shutdown already handled, ignoring {:?}", reason);
            return None;
        }

        self.phase = LifecyclePhase::ShuttingDown;
        info!("Beginning graceful shutdown: {:?}", reason);

        let mut report = self.teardown().await;
        report.reason = Some(reason);

        self.phase = LifecyclePhase::Terminated;
        info!(
            "Graceful shutdown completed: {} stopped, {} warning(s)",
            report.stopped.len(),
            report.warnings.len()
        );
        Some(report)
    }

    /// Visit every handle in reverse order and stop it.
    ///
    /// Non-running handles are visited too; `stop` is a no-op for them.
    /// Stop failures are collected and never interrupt the walk.
    pub(super) async fn teardown(&mut self) -> ShutdownReport {
        let mut report = ShutdownReport::default();

        for handle in self.handles.iter_mut().rev() {
            let was_running = handle.state() == ResourceState::Running;
            report.visited.push(handle.name().to_string());

            let result = handle.stop().await;
            if was_running {
                report.stopped.push(handle.name().to_string());
            }
            if let Err(warning) = result {
                report.warnings.push(warning);
            }
        }

        report
    }
}
