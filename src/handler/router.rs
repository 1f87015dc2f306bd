//! Request routing dispatch module
//!
//! Entry point for HTTP request processing: probe short-circuit, static
//! file dispatch and access logging.

use crate::config::AppState;
use crate::handler::health;
use crate::handler::reader::AssetReader;
use crate::handler::static_files::Outcome;
use crate::http;
use crate::logger::{self, AccessLogEntry};
use http_body_util::Full;
use hyper::body::{Body, Bytes};
use hyper::header::{HeaderName, IF_NONE_MATCH, REFERER, USER_AGENT};
use hyper::{Method, Request, Response, Version};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

/// Request context encapsulating information needed for request processing
pub struct RequestContext<'a> {
    pub path: &'a str,
    pub is_head: bool,
    pub if_none_match: Option<String>,
}

/// Main entry point for HTTP request handling
pub async fn handle_request<B, R: AssetReader>(
    req: Request<B>,
    state: Arc<AppState<R>>,
    peer_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible> {
    // 0. Liveness probes, before logging or touching the document root
    if health::is_probe_request(&req, &state.health) {
        return Ok(http::build_health_response());
    }

    let started = Instant::now();
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    // 1. Every method is served like GET; HEAD drops the body
    let ctx = RequestContext {
        path: &path,
        is_head: method == Method::HEAD,
        if_none_match: header_string(&req, &IF_NONE_MATCH),
    };

    // 2. Resolve and serve
    let (response, outcome) = state.site.serve(&ctx).await;

    // 3. Access log
    if state.access_log {
        let mut entry = AccessLogEntry::new(peer_addr.ip().to_string(), method.to_string(), path);
        entry.query = req.uri().query().map(ToString::to_string);
        entry.http_version = version_label(req.version()).to_string();
        entry.status = response.status().as_u16();
        entry.outcome = outcome.as_str();
        entry.body_bytes = response.body().size_hint().exact().unwrap_or(0);
        entry.referer = header_string(&req, &REFERER);
        entry.user_agent = header_string(&req, &USER_AGENT);
        entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
        logger::log_access(&entry, &state.access_log_format);
    }

    Ok(response)
}

fn header_string<B>(req: &Request<B>, name: &HeaderName) -> Option<String> {
    req.headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string)
}

const fn version_label(version: Version) -> &'static str {
    match version {
        Version::HTTP_09 => "0.9",
        Version::HTTP_10 => "1.0",
        Version::HTTP_2 => "2",
        Version::HTTP_3 => "3",
        _ => "1.1",
    }
}
