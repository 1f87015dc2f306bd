//! HTTP response building module
//!
//! Provides builders for every status the server emits. Bodies of error
//! responses are fixed short strings; internal paths never reach the client.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;

use super::cache::ASSET_CACHE_CONTROL;

pub const HEALTH_BODY: &str = "OK";
pub const FORBIDDEN_BODY: &str = "Forbidden";
pub const NOT_FOUND_BODY: &str = "Not Found";

/// Build liveness probe response; the connection is closed after it
pub fn build_health_response() -> Response<Full<Bytes>> {
    Response::builder()
        .status(200)
        .header("Content-Type", "text/plain")
        .header("Connection", "close")
        .body(Full::new(Bytes::from_static(HEALTH_BODY.as_bytes())))
        .unwrap_or_else(|e| {
            log_build_error("health", &e);
            Response::new(Full::new(Bytes::from_static(HEALTH_BODY.as_bytes())))
        })
}

/// Build 403 Forbidden response
pub fn build_403_response() -> Response<Full<Bytes>> {
    build_text_response(403, FORBIDDEN_BODY)
}

/// Build 404 Not Found response
pub fn build_404_response() -> Response<Full<Bytes>> {
    build_text_response(404, NOT_FOUND_BODY)
}

/// Build 304 Not Modified response
pub fn build_304_response(etag: &str) -> Response<Full<Bytes>> {
    Response::builder()
        .status(304)
        .header("ETag", etag)
        .header("Cache-Control", ASSET_CACHE_CONTROL)
        .body(Full::new(Bytes::new()))
        .unwrap_or_else(|e| {
            log_build_error("304", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build 200 asset response
///
/// `HEAD` requests keep the `Content-Length` of the full body but send none.
pub fn build_asset_response(
    data: Bytes,
    content_type: &str,
    etag: &str,
    is_head: bool,
) -> Response<Full<Bytes>> {
    let content_length = data.len();
    let body = if is_head { Bytes::new() } else { data };

    Response::builder()
        .status(200)
        .header("Content-Type", content_type)
        .header("Content-Length", content_length)
        .header("ETag", etag)
        .header("Cache-Control", ASSET_CACHE_CONTROL)
        .body(Full::new(body))
        .unwrap_or_else(|e| {
            log_build_error("200", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

fn build_text_response(status: u16, body: &'static str) -> Response<Full<Bytes>> {
    Response::builder()
        .status(status)
        .header("Content-Type", "text/plain")
        .body(Full::new(Bytes::from_static(body.as_bytes())))
        .unwrap_or_else(|e| {
            log_build_error(&status.to_string(), &e);
            Response::new(Full::new(Bytes::from_static(body.as_bytes())))
        })
}

/// Log response build error
fn log_build_error(status: &str, error: &hyper::http::Error) {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
}
