//! Liveness probe classification
//!
//! Probes are recognized from the request line and one header only, so the
//! answer never waits on the file system.

use hyper::header::{HeaderValue, USER_AGENT};
use hyper::Request;

use crate::config::HealthConfig;

/// True when the path is a reserved probe path or the user agent carries
/// the orchestrator's health-checker token
///
/// The user agent is searched as raw bytes; values that are not visible
/// ASCII still match.
pub fn is_probe(path: &str, user_agent: Option<&[u8]>, health: &HealthConfig) -> bool {
    if health.paths.iter().any(|p| p == path) {
        return true;
    }

    let token = health.user_agent_token.as_bytes();
    !token.is_empty() && user_agent.is_some_and(|ua| contains_bytes(ua, token))
}

/// Classify a request as a liveness probe
pub fn is_probe_request<B>(req: &Request<B>, health: &HealthConfig) -> bool {
    let user_agent = req.headers().get(USER_AGENT).map(HeaderValue::as_bytes);
    is_probe(req.uri().path(), user_agent, health)
}

fn contains_bytes(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|w| w == needle)
}
