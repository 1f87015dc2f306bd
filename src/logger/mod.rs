//! Logger module
//!
//! Provides logging utilities for the server including:
//! - Startup banner and shutdown lifecycle lines
//! - Access logging with multiple formats
//! - Error, warning and debug logging gated by level
//! - File-based logging support

mod format;
pub mod writer;

pub use format::AccessLogEntry;

use crate::config::{Config, LoggingConfig};
use std::net::SocketAddr;
use std::path::Path;

/// Initialize the logger with configuration
///
/// Should be called once at application startup. Until then every line goes
/// to stdout/stderr at the default level.
pub fn init(config: &LoggingConfig) -> std::io::Result<()> {
    writer::init(
        config.access_log_file.as_deref(),
        config.error_log_file.as_deref(),
        config.level,
    )
}

/// Write to info log
fn write_info(message: &str) {
    match writer::get() {
        Some(w) => w.write_info(message),
        None => println!("{message}"),
    }
}

/// Write to debug log; dropped unless the writer runs at debug level
fn write_debug(message: &str) {
    if let Some(w) = writer::get() {
        w.write_debug(message);
    }
}

/// Write to error log as a warning
fn write_warning(message: &str) {
    match writer::get() {
        Some(w) => w.write_warning(message),
        None => eprintln!("{message}"),
    }
}

/// Write to error log
fn write_error(message: &str) {
    match writer::get() {
        Some(w) => w.write_error(message),
        None => eprintln!("{message}"),
    }
}

/// Write to access log specifically
fn write_access(message: &str) {
    match writer::get() {
        Some(w) => w.write_access(message),
        None => println!("{message}"),
    }
}

pub fn log_server_start(addr: &SocketAddr, document_root: &Path, config: &Config) {
    let cwd = std::env::current_dir()
        .map_or_else(|_| "<unknown>".to_string(), |p| p.display().to_string());

    write_info("====================================");
    write_info(&format!("VinoVault starting on port {}", addr.port()));
    write_info(&format!("Listening on: http://{addr}"));
    write_info(&format!("Working Directory: {cwd}"));
    write_info(&format!("Document root: {}", document_root.display()));
    write_info(&format!("Entry document: {}", config.site.entry_document));
    write_info(&format!("Log level: {}", config.logging.level));
    write_info(&format!(
        "Shutdown drain limit: {}s (in-flight responses past it are dropped)",
        config.performance.shutdown_timeout
    ));
    if let Some(workers) = config.server.workers {
        write_info(&format!("Worker threads: {workers}"));
    }
    if let Some(ref path) = config.logging.access_log_file {
        write_info(&format!("Access log: {path}"));
    }
    if let Some(ref path) = config.logging.error_log_file {
        write_info(&format!("Error log: {path}"));
    }
    write_info("====================================");
}

pub fn log_info(message: &str) {
    write_info(&format!("[INFO] {message}"));
}

pub fn log_debug(message: &str) {
    write_debug(&format!("[DEBUG] {message}"));
}

pub fn log_error(message: &str) {
    write_error(&format!("[ERROR] {message}"));
}

pub fn log_warning(message: &str) {
    write_warning(&format!("[WARN] {message}"));
}

pub fn log_connection_error(err: &impl std::fmt::Display) {
    write_error(&format!("[ERROR] Failed to serve connection: {err}"));
}

pub fn log_entry_document_missing(path: &Path) {
    log_warning(&format!(
        "Entry document {} is missing; unmatched paths will return 404",
        path.display()
    ));
}

/// Log formatted access log entry
pub fn log_access(entry: &AccessLogEntry, format: &str) {
    write_access(&entry.format(format));
}

pub fn log_shutdown_requested(signal: &str) {
    write_info(&format!("[SIGNAL] {signal} received. Shutting down..."));
}

pub fn log_draining(active_connections: usize) {
    write_info(&format!(
        "[SHUTDOWN] Listener closed, draining {active_connections} connection(s)"
    ));
}

pub fn log_drain_timeout(timeout_secs: u64, remaining: usize) {
    log_warning(&format!(
        "[SHUTDOWN] Drain timed out after {timeout_secs}s with {remaining} connection(s) still open"
    ));
}

pub fn log_shutdown_complete() {
    write_info("[SHUTDOWN] Server stopped");
}
