//! Periodic refresh of the metrics registry.
//!
//! One cycle = one `list_all` call folded into the registry. A failed listing
//! bumps `ipset_update_errors_total` and leaves every series untouched; the
//! loop only ends when the stop channel fires (or its sender is dropped).

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use ipset_exporter_core::error::Result;
use ipset_exporter_core::should_export;

use crate::obs::ExporterMetrics;
use crate::source::StateSource;

/// Outcome of one successful cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshStats {
    pub observed: usize,
    pub exported: usize,
}

#[derive(Clone)]
pub struct Refresher {
    source: Arc<dyn StateSource>,
    metrics: Arc<ExporterMetrics>,
    names: Arc<[String]>,
}

impl Refresher {
    pub fn new(
        source: Arc<dyn StateSource>,
        metrics: Arc<ExporterMetrics>,
        names: impl Into<Arc<[String]>>,
    ) -> Self {
        Self {
            source,
            metrics,
            names: names.into(),
        }
    }

    /// Run a single refresh cycle.
    pub async fn refresh_once(&self) -> Result<RefreshStats> {
        let sets = match self.source.list_all().await {
            Ok(sets) => sets,
            Err(e) => {
                self.metrics.record_failure();
                warn!(
                    source = self.source.kind(),
                    class = e.class().as_str(),
                    error = %e,
                    "failed to list ipsets"
                );
                return Err(e);
            }
        };

        let mut exported = 0;
        for set in &sets {
            if should_export(&self.names[..], &set.name) {
                self.metrics
                    .record_set(&set.name, &set.set_type, set.entry_count);
                exported += 1;
            }
        }

        let stats = RefreshStats {
            observed: sets.len(),
            exported,
        };
        debug!(observed = stats.observed, exported = stats.exported, "ipset metrics refreshed");
        Ok(stats)
    }

    /// Spawn the periodic loop. The first tick fires one `interval` from now.
    pub fn spawn(self, interval: Duration, stop: watch::Receiver<bool>) -> JoinHandle<()> {
        tokio::spawn(async move {
            run_every(interval, stop, || {
                let this = self.clone();
                async move {
                    // Errors are already counted and logged.
                    let _ = this.refresh_once().await;
                }
            })
            .await;
            info!("stopping metrics updater");
        })
    }
}

/// Call `on_tick` every `interval` until `stop` flips to true.
///
/// The stop signal is also honoured while a tick is running: the in-flight
/// tick future is dropped rather than awaited.
pub async fn run_every<F, Fut>(interval: Duration, mut stop: watch::Receiver<bool>, mut on_tick: F)
where
    F: FnMut() -> Fut,
    Fut: Future<Output = ()>,
{
    if *stop.borrow() {
        return;
    }
    if interval.is_zero() {
        warn!("refresh interval is zero; periodic refresh disabled");
        return;
    }

    let mut ticker = time::interval_at(Instant::now() + interval, interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            changed = stop.changed() => {
                if changed.is_err() || *stop.borrow() {
                    return;
                }
            }
            _ = ticker.tick() => {
                tokio::select! {
                    biased;
                    changed = stop.changed() => {
                        if changed.is_err() || *stop.borrow() {
                            return;
                        }
                    }
                    _ = on_tick() => {}
                }
            }
        }
    }
}
