//! Helpers shared by the exporter integration tests.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(dead_code)]

use std::net::SocketAddr;

use ipset_exporter::config::ExportConfig;
use ipset_exporter_core::SetSnapshot;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

/// Listing used across tests: two wanted sets and one that is not.
pub fn sample_sets() -> Vec<SetSnapshot> {
    vec![
        SetSnapshot::new("a", "t1", 5),
        SetSnapshot::new("b", "t2", 10),
        SetSnapshot::new("c", "t3", 3),
    ]
}

pub fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

/// Export config on an ephemeral loopback port.
pub fn local_config(list: &[&str], interval_ms: u64) -> ExportConfig {
    ExportConfig {
        names: names(list),
        refresh_interval: std::time::Duration::from_millis(interval_ms),
        listen_host: "127.0.0.1".into(),
        listen_port: 0,
    }
}

/// Lines of an exposition body that carry samples (no HELP/TYPE comments).
pub fn sample_lines(body: &str, metric: &str) -> Vec<String> {
    body.lines()
        .filter(|l| l.starts_with(metric))
        .map(str::to_string)
        .collect()
}

/// Minimal HTTP/1.1 GET over a raw socket; returns (status line, body).
pub async fn http_get(addr: SocketAddr, path: &str) -> (String, String) {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    let req = format!("GET {path} HTTP/1.1\r\nHost: {addr}\r\nConnection: close\r\n\r\n");
    stream.write_all(req.as_bytes()).await.unwrap();

    let mut raw = Vec::new();
    stream.read_to_end(&mut raw).await.unwrap();
    let text = String::from_utf8(raw).unwrap();
    let (head, body) = text.split_once("\r\n\r\n").expect("http response");
    let status = head.lines().next().unwrap_or_default().to_string();
    (status, body.to_string())
}
