//! Static file serving module
//!
//! Resolves request paths under the document root, loads them through an
//! `AssetReader`, and falls back to the entry document for client-side
//! routes.

use crate::error::{ServeError, ServerError};
use crate::handler::reader::{AssetReader, DiskReader};
use crate::handler::router::RequestContext;
use crate::http::{self, cache, mime};
use crate::logger;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use std::io;
use std::path::{Path, PathBuf};

/// Where a request path points
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The root path, served by the entry document
    Entry,
    /// A candidate file inside the document root
    Asset(PathBuf),
    /// The path escapes the document root
    Forbidden,
}

/// How a served request was answered, for access logging
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Asset,
    Fallback,
    NotModified,
    Forbidden,
    NotFound,
}

impl Outcome {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asset => "asset",
            Self::Fallback => "fallback",
            Self::NotModified => "not-modified",
            Self::Forbidden => "forbidden",
            Self::NotFound => "not-found",
        }
    }
}

/// File bytes ready to be sent
#[derive(Debug, Clone)]
pub struct LoadedAsset {
    pub body: Bytes,
    pub content_type: &'static str,
    /// The entry document stood in for a missing asset
    pub fallback: bool,
}

impl LoadedAsset {
    fn new(path: &Path, body: Vec<u8>, fallback: bool) -> Self {
        Self {
            body: Bytes::from(body),
            content_type: mime::content_type_for(path),
            fallback,
        }
    }
}

/// The bundle being served: a document root plus its entry document
#[derive(Debug)]
pub struct StaticSite<R = DiskReader> {
    root: PathBuf,
    entry: PathBuf,
    reader: R,
}

impl StaticSite<DiskReader> {
    /// Open a document root on disk
    ///
    /// The root is canonicalized once here; request paths are then checked
    /// against it lexically.
    pub fn open(document_root: &str, entry_document: &str) -> Result<Self, ServerError> {
        let root = Path::new(document_root)
            .canonicalize()
            .map_err(|source| ServerError::DocumentRoot {
                path: document_root.to_string(),
                source,
            })?;

        if !root.is_dir() {
            return Err(ServerError::DocumentRoot {
                path: document_root.to_string(),
                source: io::Error::other("not a directory"),
            });
        }

        Ok(Self::with_reader(root, entry_document, DiskReader))
    }
}

impl<R: AssetReader> StaticSite<R> {
    pub fn with_reader(root: impl Into<PathBuf>, entry_document: &str, reader: R) -> Self {
        let root = root.into();
        let entry = root.join(entry_document.trim_start_matches('/'));
        Self {
            root,
            entry,
            reader,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn entry_path(&self) -> &Path {
        &self.entry
    }

    pub const fn reader(&self) -> &R {
        &self.reader
    }

    /// Map a URL path to a file under the document root
    ///
    /// Pure: no file system access. `..` segments are applied lexically and
    /// any path climbing above the root is `Forbidden`.
    pub fn resolve(&self, request_path: &str) -> Resolution {
        let mut segments: Vec<&str> = Vec::new();

        for segment in request_path.split('/') {
            match segment {
                "" | "." => {}
                ".." => {
                    if segments.pop().is_none() {
                        return Resolution::Forbidden;
                    }
                }
                s if is_unsafe_segment(s) => return Resolution::Forbidden,
                s => segments.push(s),
            }
        }

        if segments.is_empty() {
            return Resolution::Entry;
        }

        let candidate = segments
            .iter()
            .fold(self.root.clone(), |path, segment| path.join(segment));

        // Prefix check is the security boundary; keep it even though the
        // segment walk above already confines the path
        if !candidate.starts_with(&self.root) {
            return Resolution::Forbidden;
        }

        Resolution::Asset(candidate)
    }

    /// Two-step load: the candidate, then the entry document
    ///
    /// Performs no read for `Forbidden` and at most two reads otherwise.
    pub async fn load(&self, resolution: &Resolution) -> Result<LoadedAsset, ServeError> {
        let candidate = match resolution {
            Resolution::Forbidden => return Err(ServeError::PathEscape),
            Resolution::Entry => self.entry.as_path(),
            Resolution::Asset(path) => path.as_path(),
        };

        match self.reader.read(candidate).await {
            Ok(body) => return Ok(LoadedAsset::new(candidate, body, false)),
            Err(source) if candidate == self.entry => {
                return Err(self.entry_missing(source));
            }
            Err(e) => {
                logger::log_debug(&format!(
                    "{} not readable ({e}), falling back to entry document",
                    candidate.display()
                ));
            }
        }

        match self.reader.read(&self.entry).await {
            Ok(body) => Ok(LoadedAsset::new(&self.entry, body, true)),
            Err(source) => Err(self.entry_missing(source)),
        }
    }

    /// Resolve, load and build the response for a non-probe request
    pub async fn serve(&self, ctx: &RequestContext<'_>) -> (Response<Full<Bytes>>, Outcome) {
        let resolution = self.resolve(ctx.path);

        match self.load(&resolution).await {
            Ok(asset) => build_static_file_response(asset, ctx),
            Err(ServeError::PathEscape) => {
                logger::log_warning(&format!("Path traversal attempt blocked: {}", ctx.path));
                (http::build_403_response(), Outcome::Forbidden)
            }
            Err(err @ ServeError::EntryDocumentMissing { .. }) => {
                logger::log_error(&err.to_string());
                (http::build_404_response(), Outcome::NotFound)
            }
        }
    }

    fn entry_missing(&self, source: io::Error) -> ServeError {
        ServeError::EntryDocumentMissing {
            path: self.entry.clone(),
            source,
        }
    }
}

/// Segments that must never reach the file system
fn is_unsafe_segment(segment: &str) -> bool {
    segment.contains('\0') || (cfg!(windows) && (segment.contains('\\') || segment.contains(':')))
}

/// Build static file response with `ETag` revalidation
fn build_static_file_response(
    asset: LoadedAsset,
    ctx: &RequestContext<'_>,
) -> (Response<Full<Bytes>>, Outcome) {
    let etag = cache::generate_etag(&asset.body);

    if cache::check_etag_match(ctx.if_none_match.as_deref(), &etag) {
        return (http::build_304_response(&etag), Outcome::NotModified);
    }

    let outcome = if asset.fallback {
        Outcome::Fallback
    } else {
        Outcome::Asset
    };

    (
        http::build_asset_response(asset.body, asset.content_type, &etag, ctx.is_head),
        outcome,
    )
}
