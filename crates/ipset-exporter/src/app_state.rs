//! Shared state handed to HTTP handlers.
//!
//! Scrape handlers only read the registry; the refresh loop owns the writes.

use std::sync::Arc;

use crate::obs::ExporterMetrics;

#[derive(Clone)]
pub struct AppState {
    metrics: Arc<ExporterMetrics>,
}

impl AppState {
    pub fn new(metrics: Arc<ExporterMetrics>) -> Self {
        Self { metrics }
    }

    pub fn metrics(&self) -> &ExporterMetrics {
        &self.metrics
    }
}
