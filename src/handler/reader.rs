//! File system reader seam
//!
//! The static site reads files only through `AssetReader`, so tests can
//! substitute an in-memory tree and count reads.

use std::future::Future;
use std::io;
use std::path::Path;

/// Reads whole files by absolute path
pub trait AssetReader: Send + Sync + 'static {
    fn read(&self, path: &Path) -> impl Future<Output = io::Result<Vec<u8>>> + Send;
}

/// Non-blocking reads from the local file system
#[derive(Debug, Clone, Copy, Default)]
pub struct DiskReader;

impl AssetReader for DiskReader {
    async fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        tokio::fs::read(path).await
    }
}
