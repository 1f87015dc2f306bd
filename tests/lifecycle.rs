//! Server start/stop behaviour over real sockets

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{
    get, parse_response, send_raw, spa_bundle, start_server, test_config, write_bundle, APP_JS,
};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::timeout;
use vinovault_server::{AppState, Server, ServerError};

#[tokio::test]
async fn test_connection_refused_after_stop() {
    let dir = spa_bundle();
    let handle = start_server(dir.path());
    let addr = handle.local_addr();

    assert_eq!(get(addr, "/app.js").await.status, 200);

    handle.stop().await.unwrap();

    assert!(TcpStream::connect(addr).await.is_err());
}

#[tokio::test]
async fn test_health_closes_keep_alive_connection() {
    let dir = spa_bundle();
    let handle = start_server(dir.path());

    // No Connection header: only the probe response can end the stream
    let raw = "GET /_health HTTP/1.1\r\nHost: localhost\r\n\r\n";
    let resp = timeout(Duration::from_secs(5), send_raw(handle.local_addr(), raw))
        .await
        .expect("probe response must close the connection");
    assert_eq!(resp.status, 200);
    assert_eq!(resp.header("connection"), Some("close"));
    assert_eq!(resp.text(), "OK");

    handle.stop().await.unwrap();
}

#[tokio::test]
async fn test_instances_coexist() {
    let first_dir = spa_bundle();
    let second_dir = write_bundle(&[
        ("index.html", b"<p>second</p>".as_slice()),
        ("app.js", b"// second".as_slice()),
    ]);

    let first = start_server(first_dir.path());
    let second = start_server(second_dir.path());
    assert_ne!(first.local_addr(), second.local_addr());

    assert_eq!(get(first.local_addr(), "/app.js").await.text(), APP_JS);
    assert_eq!(get(second.local_addr(), "/app.js").await.text(), "// second");

    first.stop().await.unwrap();

    // Stopping one leaves the other serving
    assert_eq!(get(second.local_addr(), "/x").await.text(), "<p>second</p>");
    second.stop().await.unwrap();
}

#[tokio::test]
async fn test_bind_conflict_is_fatal() {
    let dir = spa_bundle();
    let handle = start_server(dir.path());
    let cfg = test_config(dir.path());

    let state = Arc::new(AppState::from_config(&cfg).unwrap());
    let err = Server::bind(handle.local_addr(), state, &cfg.performance)
        .err()
        .expect("second bind on the same port must fail");
    match err {
        ServerError::Bind { addr, source } => {
            assert_eq!(addr, handle.local_addr());
            assert_eq!(source.kind(), std::io::ErrorKind::AddrInUse);
        }
        other => panic!("unexpected error: {other}"),
    }

    handle.stop().await.unwrap();
}

#[tokio::test]
async fn test_missing_document_root() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = test_config(&dir.path().join("dist"));

    let err = Server::from_config(&cfg)
        .err()
        .expect("missing document root must fail");
    assert!(matches!(err, ServerError::DocumentRoot { .. }));
}

#[tokio::test]
async fn test_stop_with_idle_connection() {
    let dir = spa_bundle();
    let handle = start_server(dir.path());

    // Accepted but never sends a request
    let _idle = TcpStream::connect(handle.local_addr()).await.unwrap();
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(handle.active_connections(), 1);

    timeout(Duration::from_secs(4), handle.stop())
        .await
        .expect("idle connections must not hold up shutdown")
        .unwrap();
}

#[tokio::test]
async fn test_stop_is_bounded_by_shutdown_timeout() {
    let dir = spa_bundle();
    let mut cfg = test_config(dir.path());
    cfg.performance.shutdown_timeout = 1;
    let handle = Server::from_config(&cfg).unwrap().start();

    // Partial request line keeps the connection mid-request
    let mut stuck = TcpStream::connect(handle.local_addr()).await.unwrap();
    tokio::io::AsyncWriteExt::write_all(&mut stuck, b"GET /app.js HTTP/1.1\r\nHost: loc")
        .await
        .unwrap();
    tokio::time::sleep(Duration::from_millis(50)).await;

    timeout(Duration::from_secs(4), handle.stop())
        .await
        .expect("stop must give up after the shutdown timeout")
        .unwrap();
}

#[tokio::test]
async fn test_slow_reader_receives_whole_asset() {
    let bundle = vec![b'x'; 16 * 1024 * 1024];
    let dir = write_bundle(&[("bundle.js", bundle.as_slice())]);
    let mut cfg = test_config(dir.path());
    cfg.performance.connection_timeout = 1;
    let handle = Server::from_config(&cfg).unwrap().start();

    let mut stream = TcpStream::connect(handle.local_addr()).await.unwrap();
    stream
        .write_all(b"GET /bundle.js HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n")
        .await
        .unwrap();

    // Stall past the timeout while the response is still in flight
    tokio::time::sleep(Duration::from_millis(1500)).await;

    let mut buf = Vec::new();
    stream.read_to_end(&mut buf).await.unwrap();
    let resp = parse_response(&buf);
    assert_eq!(resp.status, 200);
    assert_eq!(resp.body.len(), bundle.len());

    handle.stop().await.unwrap();
}
