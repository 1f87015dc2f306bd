// Connection handling module
// Accepts a single TCP connection and serves it on its own task

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::{TokioIo, TokioTimer};
use hyper_util::server::graceful::GracefulShutdown;

use crate::config::{AppState, PerformanceConfig};
use crate::handler::{self, AssetReader};
use crate::logger;

/// Per-connection settings derived from `PerformanceConfig`
#[derive(Debug, Clone, Copy)]
pub struct ConnectionSettings {
    pub keep_alive: bool,
    /// Bound on reading a request head
    pub header_read_timeout: Duration,
    pub max_connections: Option<usize>,
}

impl From<&PerformanceConfig> for ConnectionSettings {
    fn from(perf: &PerformanceConfig) -> Self {
        Self {
            keep_alive: perf.keep_alive,
            header_read_timeout: Duration::from_secs(perf.connection_timeout),
            max_connections: perf
                .max_connections
                .map(|max| usize::try_from(max).unwrap_or(usize::MAX)),
        }
    }
}

/// Accept and process a connection, checking limits.
///
/// # Arguments
///
/// * `stream` - The TCP stream to handle
/// * `peer_addr` - The peer's socket address
/// * `state` - Shared application state
/// * `conn_counter` - Active connection counter
/// * `settings` - Keep-alive, timeout and limit settings
/// * `graceful` - Shutdown watcher the connection registers with
pub fn accept_connection<R: AssetReader>(
    stream: tokio::net::TcpStream,
    peer_addr: std::net::SocketAddr,
    state: &Arc<AppState<R>>,
    conn_counter: &Arc<AtomicUsize>,
    settings: ConnectionSettings,
    graceful: &GracefulShutdown,
) {
    // Increment counter first, then check limit (prevents race condition)
    let prev_count = conn_counter.fetch_add(1, Ordering::SeqCst);

    if let Some(max_conn) = settings.max_connections {
        if prev_count >= max_conn {
            // Exceeded limit: rollback counter and reject
            conn_counter.fetch_sub(1, Ordering::SeqCst);
            logger::log_warning(&format!(
                "Max connections reached: {prev_count}/{max_conn}. Connection from {peer_addr} rejected."
            ));
            drop(stream);
            return;
        }
    }

    logger::log_debug(&format!("Accepted connection from {peer_addr}"));

    handle_connection(
        stream,
        peer_addr,
        Arc::clone(state),
        Arc::clone(conn_counter),
        settings,
        graceful,
    );
}

/// Handle a single connection in a spawned task.
///
/// This function:
/// 1. Wraps the TCP stream in `TokioIo`
/// 2. Configures HTTP/1.1 connection settings (keep-alive, header read timeout)
/// 3. Registers the connection with the graceful shutdown watcher
/// 4. Decrements connection counter when done
///
/// A response that has started is never cut short by a timer; only waiting
/// for the next request head is bounded.
fn handle_connection<R: AssetReader>(
    stream: tokio::net::TcpStream,
    peer_addr: std::net::SocketAddr,
    state: Arc<AppState<R>>,
    conn_counter: Arc<AtomicUsize>,
    settings: ConnectionSettings,
    graceful: &GracefulShutdown,
) {
    let io = TokioIo::new(stream);

    let mut builder = http1::Builder::new();
    builder.keep_alive(settings.keep_alive);
    builder.timer(TokioTimer::new());
    builder.header_read_timeout(settings.header_read_timeout);

    let conn = builder.serve_connection(
        io,
        service_fn(move |req| {
            let state = Arc::clone(&state);
            async move { handler::handle_request(req, state, peer_addr).await }
        }),
    );
    let conn = graceful.watch(conn);

    tokio::spawn(async move {
        if let Err(err) = conn.await {
            if err.is_timeout() {
                logger::log_debug(&format!(
                    "Connection from {peer_addr} idle for {} seconds, closing",
                    settings.header_read_timeout.as_secs()
                ));
            } else {
                logger::log_connection_error(&err);
            }
        }

        conn_counter.fetch_sub(1, Ordering::SeqCst);
    });
}
