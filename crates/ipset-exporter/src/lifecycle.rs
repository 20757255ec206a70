//! Application lifecycle: boot and shutdown sequencing.
//!
//! Boot: register metrics, refresh once synchronously, start the refresh
//! loop, then bind the server. Shutdown: stop the loop, then drain the
//! server, both inside one deadline.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant};
use tracing::{info, warn};

use ipset_exporter_core::error::{ExporterError, Result};

use crate::config::ExportConfig;
use crate::obs::ExporterMetrics;
use crate::refresh::Refresher;
use crate::server::MetricsServer;
use crate::source::StateSource;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Created,
    Booting,
    Running,
    ShuttingDown,
    Stopped,
}

pub struct Exporter {
    cfg: ExportConfig,
    source: Arc<dyn StateSource>,
    metrics: Arc<ExporterMetrics>,
    state: LifecycleState,
    stop_tx: watch::Sender<bool>,
    updater: Option<JoinHandle<()>>,
    server: Option<MetricsServer>,
}

impl Exporter {
    pub fn new(cfg: ExportConfig, source: Arc<dyn StateSource>) -> Result<Self> {
        let metrics = Arc::new(ExporterMetrics::new()?);
        let (stop_tx, _) = watch::channel(false);
        Ok(Self {
            cfg,
            source,
            metrics,
            state: LifecycleState::Created,
            stop_tx,
            updater: None,
            server: None,
        })
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    pub fn metrics(&self) -> Arc<ExporterMetrics> {
        Arc::clone(&self.metrics)
    }

    /// Address the server is listening on, once running.
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.server.as_ref().map(MetricsServer::local_addr)
    }

    /// Bring the exporter up. Any error leaves it `Stopped` with nothing running.
    pub async fn boot(&mut self) -> Result<SocketAddr> {
        if self.state != LifecycleState::Created {
            return Err(ExporterError::Internal(format!(
                "boot called in state {:?}",
                self.state
            )));
        }
        self.state = LifecycleState::Booting;

        match self.boot_inner().await {
            Ok(addr) => {
                self.state = LifecycleState::Running;
                info!(%addr, names = ?self.cfg.names, "exporter running");
                Ok(addr)
            }
            Err(e) => {
                let _ = self.stop_tx.send(true);
                if let Some(updater) = self.updater.take() {
                    updater.abort();
                }
                self.state = LifecycleState::Stopped;
                Err(e)
            }
        }
    }

    async fn boot_inner(&mut self) -> Result<SocketAddr> {
        if self.cfg.refresh_interval.is_zero() {
            return Err(ExporterError::Config(
                "refresh interval must be greater than zero".into(),
            ));
        }
        self.metrics.register()?;

        let refresher = Refresher::new(
            Arc::clone(&self.source),
            Arc::clone(&self.metrics),
            self.cfg.names.clone(),
        );

        // A failed or stalled first listing is counted like any other; boot
        // goes on so the failure counter is scrapeable.
        match time::timeout(self.cfg.refresh_interval, refresher.refresh_once()).await {
            Ok(Ok(stats)) => {
                info!(observed = stats.observed, exported = stats.exported, "initial ipset refresh done");
            }
            Ok(Err(_)) => {}
            Err(_) => {
                self.metrics.record_failure();
                warn!(
                    timeout = ?self.cfg.refresh_interval,
                    "initial ipset refresh timed out"
                );
            }
        }

        self.updater = Some(refresher.spawn(self.cfg.refresh_interval, self.stop_tx.subscribe()));

        let server = MetricsServer::start(
            &self.cfg.listen_host,
            self.cfg.listen_port,
            Arc::clone(&self.metrics),
        )
        .await?;
        let addr = server.local_addr();
        self.server = Some(server);
        Ok(addr)
    }

    /// Stop the refresh loop, then the server, within `timeout`.
    ///
    /// Calling this before `boot` (or twice) is a no-op that ends `Stopped`.
    pub async fn shutdown(&mut self, timeout: Duration) -> Result<()> {
        if self.state != LifecycleState::Running {
            self.state = LifecycleState::Stopped;
            return Ok(());
        }
        self.state = LifecycleState::ShuttingDown;
        let deadline = Instant::now() + timeout;
        let mut result = Ok(());

        let _ = self.stop_tx.send(true);
        if let Some(mut updater) = self.updater.take() {
            match time::timeout_at(deadline, &mut updater).await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => warn!(error = %e, "metrics updater task failed"),
                Err(_) => {
                    updater.abort();
                    warn!("metrics updater did not stop in time");
                    result = Err(ExporterError::ShutdownTimeout(timeout));
                }
            }
        }

        if let Some(server) = self.server.take() {
            if let Err(e) = server.shutdown(deadline).await {
                if result.is_ok() {
                    result = Err(match e {
                        ExporterError::ShutdownTimeout(_) => ExporterError::ShutdownTimeout(timeout),
                        other => other,
                    });
                }
            }
        }

        self.state = LifecycleState::Stopped;
        result
    }
}
