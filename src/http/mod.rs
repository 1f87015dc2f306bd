//! HTTP protocol layer module
//!
//! Provides HTTP protocol-related base functionality, decoupled from how
//! requests are resolved to files.

pub mod cache;
pub mod mime;
pub mod response;

// Re-export commonly used builders
pub use response::{
    build_304_response, build_403_response, build_404_response, build_asset_response,
    build_health_response,
};
