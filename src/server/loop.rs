// Server loop module
// Accepts connections until the shutdown signal, then drains in-flight ones

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use hyper_util::server::graceful::GracefulShutdown;
use tokio::net::TcpListener;
use tokio::sync::watch;

use super::connection::{accept_connection, ConnectionSettings};
use crate::config::AppState;
use crate::handler::AssetReader;
use crate::logger;

/// Everything the accept loop needs besides the listener
pub struct ServerLoopConfig<R> {
    pub state: Arc<AppState<R>>,
    pub active_connections: Arc<AtomicUsize>,
    pub settings: ConnectionSettings,
    pub shutdown: watch::Receiver<bool>,
    pub shutdown_timeout: Duration,
}

/// Run the accept loop until shutdown is requested
///
/// The listener is dropped exactly once, as soon as the signal arrives, so no
/// new connection is accepted afterwards. Connections already accepted are
/// then given `shutdown_timeout` to finish.
///
/// The drain is bounded: responses still in flight when `shutdown_timeout`
/// expires are abandoned. Keep it at or below the orchestrator's kill grace
/// period.
pub async fn start_server_loop<R: AssetReader>(listener: TcpListener, config: ServerLoopConfig<R>) {
    let ServerLoopConfig {
        state,
        active_connections,
        settings,
        mut shutdown,
        shutdown_timeout,
    } = config;
    let graceful = GracefulShutdown::new();

    loop {
        tokio::select! {
            biased;

            // Err means every handle is gone, which is a stop as well
            _ = shutdown.changed() => break,

            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => {
                        accept_connection(
                            stream,
                            peer_addr,
                            &state,
                            &active_connections,
                            settings,
                            &graceful,
                        );
                    }
                    Err(e) => {
                        logger::log_error(&format!("Failed to accept connection: {e}"));
                    }
                }
            }
        }
    }

    drop(listener);
    logger::log_draining(active_connections.load(Ordering::SeqCst));

    if tokio::time::timeout(shutdown_timeout, graceful.shutdown())
        .await
        .is_err()
    {
        logger::log_drain_timeout(
            shutdown_timeout.as_secs(),
            active_connections.load(Ordering::SeqCst),
        );
    }
}
