//! Exposition server: the HTTP listener that serves scrapes.
//!
//! Binding happens in [`MetricsServer::start`] so that "address in use" is a
//! boot failure the caller sees, not a log line from a background task.

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant};
use tracing::{info, warn};

use ipset_exporter_core::error::{ExporterError, Result};

use crate::{app_state::AppState, obs::ExporterMetrics, router};

pub struct MetricsServer {
    local_addr: SocketAddr,
    shutdown_tx: Option<oneshot::Sender<()>>,
    handle: JoinHandle<io::Result<()>>,
}

impl MetricsServer {
    /// Bind `host:port` and start serving in a background task.
    pub async fn start(host: &str, port: u16, metrics: Arc<ExporterMetrics>) -> Result<Self> {
        let addr = format!("{host}:{port}");
        let listener = TcpListener::bind((host, port))
            .await
            .map_err(|e| ExporterError::Bind {
                addr: addr.clone(),
                reason: e.to_string(),
            })?;
        let local_addr = listener.local_addr().map_err(|e| ExporterError::Bind {
            addr,
            reason: e.to_string(),
        })?;

        let app = router::build_router(AppState::new(metrics));
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

        let handle = tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    // A dropped sender also means "stop".
                    let _ = shutdown_rx.await;
                })
                .await
        });

        info!(%local_addr, path = router::METRICS_PATH, "serving metrics http server");
        Ok(Self {
            local_addr,
            shutdown_tx: Some(shutdown_tx),
            handle,
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Stop accepting, drain in-flight scrapes, and wait until `deadline`.
    ///
    /// On expiry the serving task is aborted and `ShutdownTimeout` returned.
    pub async fn shutdown(mut self, deadline: Instant) -> Result<()> {
        let budget = deadline.saturating_duration_since(Instant::now());
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }

        match time::timeout_at(deadline, &mut self.handle).await {
            Ok(Ok(Ok(()))) => {
                info!(local_addr = %self.local_addr, "metrics http server stopped");
                Ok(())
            }
            Ok(Ok(Err(e))) => Err(ExporterError::Internal(format!("metrics server failed: {e}"))),
            Ok(Err(e)) => Err(ExporterError::Internal(format!("metrics server task failed: {e}"))),
            Err(_) => {
                self.handle.abort();
                warn!(local_addr = %self.local_addr, ?budget, "metrics http server did not drain in time");
                Err(ExporterError::ShutdownTimeout(budget))
            }
        }
    }
}
