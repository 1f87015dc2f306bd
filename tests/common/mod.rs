//! Shared utilities for integration testing: an on-disk bundle, an
//! in-process server on an ephemeral port, and a raw HTTP/1.1 client.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::Path;

use tempfile::TempDir;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use vinovault_server::{Config, Server, ServerHandle};

pub const INDEX_HTML: &str = "<!doctype html><html><body><div id=\"root\"></div></body></html>";
pub const APP_JS: &str = "import { Cellar } from './cellar.js';";

/// Parsed HTTP response
#[derive(Debug)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: HashMap<String, String>,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_ascii_lowercase()).map(String::as_str)
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Write a bundle into a fresh temporary document root
pub fn write_bundle(files: &[(&str, &[u8])]) -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    for (name, body) in files {
        let path = dir.path().join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(path, body).unwrap();
    }
    dir
}

/// The standard single-page bundle: an entry document and one script
pub fn spa_bundle() -> TempDir {
    write_bundle(&[
        ("index.html", INDEX_HTML.as_bytes()),
        ("app.js", APP_JS.as_bytes()),
    ])
}

/// Test configuration serving `root` on an ephemeral loopback port
pub fn test_config(root: &Path) -> Config {
    let mut cfg = Config::defaults().unwrap();
    cfg.server.host = "127.0.0.1".to_string();
    cfg.server.port = 0;
    cfg.site.document_root = root.to_str().unwrap().to_string();
    cfg.logging.access_log = false;
    cfg.performance.shutdown_timeout = 5;
    cfg
}

/// Bind and start a server for `root`
pub fn start_server(root: &Path) -> ServerHandle {
    Server::from_config(&test_config(root)).unwrap().start()
}

/// Send raw request bytes and read until the server closes the connection
pub async fn send_raw(addr: SocketAddr, request: &str) -> HttpResponse {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream.write_all(request.as_bytes()).await.unwrap();

    let mut buf = Vec::new();
    stream.read_to_end(&mut buf).await.unwrap();
    parse_response(&buf)
}

/// Send a request with `Connection: close`
pub async fn request(addr: SocketAddr, method: &str, path: &str, headers: &[(&str, &str)]) -> HttpResponse {
    let mut raw = format!("{method} {path} HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n");
    for (name, value) in headers {
        raw.push_str(&format!("{name}: {value}\r\n"));
    }
    raw.push_str("\r\n");
    send_raw(addr, &raw).await
}

pub async fn get(addr: SocketAddr, path: &str) -> HttpResponse {
    request(addr, "GET", path, &[]).await
}

pub fn parse_response(buf: &[u8]) -> HttpResponse {
    let split = buf
        .windows(4)
        .position(|w| w == b"\r\n\r\n")
        .expect("response has no header terminator");
    let head = std::str::from_utf8(&buf[..split]).unwrap();
    let body = buf[split + 4..].to_vec();

    let mut lines = head.split("\r\n");
    let status_line = lines.next().unwrap();
    let status = status_line
        .split(' ')
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap();

    let headers = lines
        .filter_map(|line| line.split_once(':'))
        .map(|(k, v)| (k.trim().to_ascii_lowercase(), v.trim().to_string()))
        .collect();

    HttpResponse {
        status,
        headers,
        body,
    }
}
