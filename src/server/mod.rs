// Server module entry point
// Owns the listening socket and the accept loop; `Server::start` hands back
// a `ServerHandle` whose `stop` drains and closes it

pub mod connection;
pub mod listener;
pub mod signal;

// Rust does not allow `loop` as a module name (keyword), use server_loop
#[path = "loop.rs"]
pub mod server_loop;

use std::net::SocketAddr;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::config::{AppState, Config, PerformanceConfig};
use crate::error::ServerError;
use crate::handler::{AssetReader, DiskReader};
use crate::logger;

pub use connection::ConnectionSettings;
pub use listener::create_listener;
pub use server_loop::{start_server_loop, ServerLoopConfig};
pub use signal::ShutdownSignals;

/// A bound, not yet running server
pub struct Server<R = DiskReader> {
    listener: tokio::net::TcpListener,
    local_addr: SocketAddr,
    state: Arc<AppState<R>>,
    settings: ConnectionSettings,
    shutdown_timeout: Duration,
}

impl Server<DiskReader> {
    /// Open the configured document root and bind the configured address
    ///
    /// Must be called from within a Tokio runtime.
    pub fn from_config(config: &Config) -> Result<Self, ServerError> {
        let addr = config.get_socket_addr()?;
        let state = AppState::from_config(config)?;

        if !state.site.entry_path().is_file() {
            logger::log_entry_document_missing(state.site.entry_path());
        }

        Self::bind(addr, Arc::new(state), &config.performance)
    }
}

impl<R: AssetReader> Server<R> {
    /// Bind the listening socket; failure here is fatal and not retried
    ///
    /// Must be called from within a Tokio runtime.
    pub fn bind(
        addr: SocketAddr,
        state: Arc<AppState<R>>,
        performance: &PerformanceConfig,
    ) -> Result<Self, ServerError> {
        let listener = create_listener(addr).map_err(|source| ServerError::Bind { addr, source })?;
        let local_addr = listener
            .local_addr()
            .map_err(|source| ServerError::Bind { addr, source })?;

        Ok(Self {
            listener,
            local_addr,
            state,
            settings: ConnectionSettings::from(performance),
            shutdown_timeout: Duration::from_secs(performance.shutdown_timeout),
        })
    }

    /// Address actually bound (resolves port 0)
    pub const fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn document_root(&self) -> &Path {
        self.state.site.root()
    }

    /// Spawn the accept loop
    pub fn start(self) -> ServerHandle {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let active_connections = Arc::new(AtomicUsize::new(0));

        let config = ServerLoopConfig {
            state: self.state,
            active_connections: Arc::clone(&active_connections),
            settings: self.settings,
            shutdown: shutdown_rx,
            shutdown_timeout: self.shutdown_timeout,
        };
        let task = tokio::spawn(start_server_loop(self.listener, config));

        ServerHandle {
            local_addr: self.local_addr,
            shutdown: shutdown_tx,
            active_connections,
            task,
        }
    }
}

/// Handle to a running server
pub struct ServerHandle {
    local_addr: SocketAddr,
    shutdown: watch::Sender<bool>,
    active_connections: Arc<AtomicUsize>,
    task: JoinHandle<()>,
}

impl ServerHandle {
    pub const fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Connections currently being served
    pub fn active_connections(&self) -> usize {
        self.active_connections.load(Ordering::SeqCst)
    }

    /// Stop accepting, close the listener, and wait for in-flight
    /// connections to drain (bounded by the shutdown timeout)
    pub async fn stop(self) -> Result<(), ServerError> {
        // The loop may already have exited; a closed channel is fine
        let _ = self.shutdown.send(true);
        self.task.await?;
        Ok(())
    }
}
