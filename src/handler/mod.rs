//! Request handler module
//!
//! Responsible for request dispatch: liveness probes first, then static
//! file serving with the single-page-app fallback.

pub mod health;
pub mod reader;
pub mod router;
pub mod static_files;

// Re-export main entry point
pub use reader::{AssetReader, DiskReader};
pub use router::handle_request;
pub use static_files::{Outcome, Resolution, StaticSite};
