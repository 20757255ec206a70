#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

mod common;

use std::sync::Arc;
use std::time::Duration;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tokio::time::Instant;
use tower::ServiceExt;

use ipset_exporter::app_state::AppState;
use ipset_exporter::obs::ExporterMetrics;
use ipset_exporter::router::build_router;
use ipset_exporter::server::MetricsServer;
use ipset_exporter_core::ErrorClass;

use common::http_get;

fn registered_metrics() -> Arc<ExporterMetrics> {
    let metrics = Arc::new(ExporterMetrics::new().unwrap());
    metrics.register().unwrap();
    metrics
}

#[tokio::test]
async fn router_serves_metrics() {
    let metrics = registered_metrics();
    metrics.record_set("blocklist", "hash:ip", 42);
    let app = build_router(AppState::new(metrics));

    let res = app
        .oneshot(Request::get("/metrics").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let ct = res.headers().get(header::CONTENT_TYPE).unwrap().to_str().unwrap();
    assert!(ct.starts_with("text/plain; version=0.0.4"));

    let body = to_bytes(res.into_body(), usize::MAX).await.unwrap();
    let body = String::from_utf8(body.to_vec()).unwrap();
    assert!(body.contains("ipset_entries_count{set=\"blocklist\",type=\"hash:ip\"} 42"));
}

#[tokio::test]
async fn router_rejects_other_paths() {
    let app = build_router(AppState::new(registered_metrics()));
    let res = app
        .oneshot(Request::get("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn router_rejects_non_get() {
    let app = build_router(AppState::new(registered_metrics()));
    let res = app
        .oneshot(Request::post("/metrics").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn serves_scrapes_over_tcp_and_shuts_down() {
    let metrics = registered_metrics();
    metrics.record_failure();
    let server = MetricsServer::start("127.0.0.1", 0, Arc::clone(&metrics))
        .await
        .unwrap();
    let addr = server.local_addr();
    assert_ne!(addr.port(), 0);

    let (status, body) = http_get(addr, "/metrics").await;
    assert!(status.contains("200"), "{status}");
    assert!(body.contains("ipset_update_errors_total 1"));

    server
        .shutdown(Instant::now() + Duration::from_secs(5))
        .await
        .unwrap();
    assert!(tokio::net::TcpStream::connect(addr).await.is_err());
}

#[tokio::test]
async fn bind_failure_is_a_boot_error() {
    let taken = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = taken.local_addr().unwrap().port();

    let err = MetricsServer::start("127.0.0.1", port, registered_metrics())
        .await
        .err()
        .expect("bind must fail");
    assert_eq!(err.class().as_str(), "BOOT");
    assert!(err.to_string().contains(&format!("127.0.0.1:{port}")));
}

#[tokio::test]
async fn shutdown_timeout_is_reported() {
    let server = MetricsServer::start("127.0.0.1", 0, registered_metrics())
        .await
        .unwrap();
    let addr = server.local_addr();

    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream.write_all(b"GET /metrics HTTP/1.1\r\n").await.unwrap();
    tokio::time::sleep(Duration::from_millis(50)).await;

    let started = Instant::now();
    let err = server
        .shutdown(Instant::now() + Duration::from_millis(300))
        .await
        .expect_err("pending request must hold the drain open");
    assert_eq!(err.class(), ErrorClass::ShutdownTimeout);
    assert!(started.elapsed() < Duration::from_secs(2));
    drop(stream);
}
