//! Error types
//!
//! `ServeError` never leaves the request handler: every variant is turned into
//! a status code. `ServerError` covers startup and lifecycle failures and is
//! what `main` maps to a non-zero exit code.

use std::io;
use std::net::SocketAddr;
use std::path::PathBuf;
use thiserror::Error;

/// Per-request failure, converted to an HTTP status by the handler
#[derive(Debug, Error)]
pub enum ServeError {
    /// The request path resolves outside the document root (403)
    #[error("path escapes the document root")]
    PathEscape,

    /// Neither the asset nor the entry document could be read (404)
    #[error("entry document {} is unreadable: {source}", path.display())]
    EntryDocumentMissing {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl ServeError {
    /// Status code reported to the client
    pub const fn status(&self) -> u16 {
        match self {
            Self::PathEscape => 403,
            Self::EntryDocumentMissing { .. } => 404,
        }
    }
}

/// Startup and lifecycle failure
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("invalid listen address '{addr}': {source}")]
    InvalidAddress {
        addr: String,
        #[source]
        source: std::net::AddrParseError,
    },

    #[error("document root '{path}' is not accessible: {source}")]
    DocumentRoot {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },

    #[error("failed to register signal handler: {0}")]
    Signal(#[source] io::Error),

    #[error("logger initialization failed: {0}")]
    Logger(#[source] io::Error),

    #[error("runtime error: {0}")]
    Runtime(#[source] io::Error),

    #[error("server task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}
