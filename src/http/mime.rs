//! MIME type detection module
//!
//! Maps a file extension to its Content-Type over a closed set of known
//! extensions. Anything outside the set is served as opaque binary.

use std::path::Path;

/// Content type for extensions outside the known set
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Extensions the bundle is expected to contain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extension {
    Html,
    Js,
    Css,
    Json,
    Png,
    Jpg,
    Jpeg,
    Svg,
    Ts,
    Tsx,
    Ico,
}

impl Extension {
    pub const ALL: [Self; 11] = [
        Self::Html,
        Self::Js,
        Self::Css,
        Self::Json,
        Self::Png,
        Self::Jpg,
        Self::Jpeg,
        Self::Svg,
        Self::Ts,
        Self::Tsx,
        Self::Ico,
    ];

    /// Parse an extension (without the dot), ignoring ASCII case
    pub fn parse(ext: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|known| known.as_str().eq_ignore_ascii_case(ext))
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Html => "html",
            Self::Js => "js",
            Self::Css => "css",
            Self::Json => "json",
            Self::Png => "png",
            Self::Jpg => "jpg",
            Self::Jpeg => "jpeg",
            Self::Svg => "svg",
            Self::Ts => "ts",
            Self::Tsx => "tsx",
            Self::Ico => "ico",
        }
    }

    pub const fn content_type(self) -> &'static str {
        match self {
            Self::Html => "text/html",
            // TypeScript sources are shipped to the browser as scripts
            Self::Js | Self::Ts | Self::Tsx => "text/javascript",
            Self::Css => "text/css",
            Self::Json => "application/json",
            Self::Png => "image/png",
            Self::Jpg | Self::Jpeg => "image/jpeg",
            Self::Svg => "image/svg+xml",
            Self::Ico => "image/x-icon",
        }
    }
}

/// Get MIME Content-Type based on file extension
///
/// # Examples
/// ```
/// use vinovault_server::http::mime::get_content_type;
/// assert_eq!(get_content_type(Some("html")), "text/html");
/// assert_eq!(get_content_type(Some("TSX")), "text/javascript");
/// assert_eq!(get_content_type(None), "application/octet-stream");
/// ```
pub fn get_content_type(extension: Option<&str>) -> &'static str {
    extension
        .and_then(Extension::parse)
        .map_or(DEFAULT_CONTENT_TYPE, Extension::content_type)
}

/// Get MIME Content-Type for a file path
pub fn content_type_for(path: &Path) -> &'static str {
    get_content_type(path.extension().and_then(|e| e.to_str()))
}
