//! VinoVault static delivery server
//!
//! Serves the bundled single-page app from a document root, answers
//! orchestrator liveness probes without touching disk, and falls back to the
//! entry document for client-side routes.

pub mod config;
pub mod error;
pub mod handler;
pub mod http;
pub mod logger;
pub mod server;

pub use config::{AppState, Config};
pub use error::{ServeError, ServerError};
pub use handler::{AssetReader, DiskReader, StaticSite};
pub use server::{Server, ServerHandle};
