// Signal handling module
//
// Supported signals:
// - SIGTERM: Graceful shutdown (orchestrator stop)
// - SIGINT:  Graceful shutdown (Ctrl+C)

use crate::error::ServerError;

/// Termination signals the process reacts to
///
/// Handlers are registered on construction, before the listener is bound,
/// so a signal arriving during startup is not lost to the default action.
pub struct ShutdownSignals {
    #[cfg(unix)]
    sigterm: tokio::signal::unix::Signal,
    #[cfg(unix)]
    sigint: tokio::signal::unix::Signal,
}

impl ShutdownSignals {
    /// Register signal handlers (Unix)
    ///
    /// | Signal  | Action           |
    /// |---------|------------------|
    /// | SIGTERM | Graceful stop    |
    /// | SIGINT  | Graceful stop    |
    #[cfg(unix)]
    pub fn register() -> Result<Self, ServerError> {
        use tokio::signal::unix::{signal, SignalKind};

        Ok(Self {
            sigterm: signal(SignalKind::terminate()).map_err(ServerError::Signal)?,
            sigint: signal(SignalKind::interrupt()).map_err(ServerError::Signal)?,
        })
    }

    /// Windows fallback - only handles Ctrl+C
    #[cfg(not(unix))]
    pub fn register() -> Result<Self, ServerError> {
        Ok(Self {})
    }

    /// Wait for the next termination signal and return its name
    #[cfg(unix)]
    pub async fn recv(&mut self) -> &'static str {
        tokio::select! {
            _ = self.sigterm.recv() => "SIGTERM",
            _ = self.sigint.recv() => "SIGINT",
        }
    }

    /// Wait for Ctrl+C
    #[cfg(not(unix))]
    pub async fn recv(&mut self) -> &'static str {
        if let Err(e) = tokio::signal::ctrl_c().await {
            crate::logger::log_error(&format!("Ctrl+C handler failed: {e}"));
            std::future::pending::<()>().await;
        }
        "Ctrl+C"
    }
}
