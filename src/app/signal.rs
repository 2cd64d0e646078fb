use super::ShutdownReason;
use crate::error::Result;
use async_trait::async_trait;
use tokio::signal;
use tracing::info;

/// Source of the one termination event the orchestrator waits for
#[async_trait]
pub trait ShutdownSignal: Send {
    async fn wait(&mut self) -> Result<ShutdownReason>;
}

/// Waits for an operator interrupt: Ctrl+C everywhere, SIGTERM on Unix.
///
/// Once a handler is registered the runtime keeps it installed, so further
/// interrupts during teardown are absorbed instead of killing the process.
#[derive(Debug, Default)]
pub struct SignalWaiter;

impl SignalWaiter {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ShutdownSignal for SignalWaiter {
    async fn wait(&mut self) -> Result<ShutdownReason> {
        #[cfg(unix)]
        {
            use tokio::signal::unix::{signal as unix_signal, SignalKind};

            // Handle SIGTERM (systemd stop)
            let mut terminate = unix_signal(SignalKind::terminate())?;

            tokio::select! {
                result = signal::ctrl_c() => {
                    result?;
                    info!("Received SIGINT signal (Ctrl+C)");
                    Ok(ShutdownReason::Signal("SIGINT".to_string()))
                }
                _ = terminate.recv() => {
                    info!("Received SIGTERM signal");
                    Ok(ShutdownReason::Signal("SIGTERM".to_string()))
                }
            }
        }

        #[cfg(not(unix))]
        {
            signal::ctrl_c().await?;
            info!("Received SIGINT signal (Ctrl+C)");
            Ok(ShutdownReason::Signal("SIGINT".to_string()))
        }
    }
}
