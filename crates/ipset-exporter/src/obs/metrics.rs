//! Metrics registry for the exporter.
//!
//! Instruments live in an owned `prometheus::Registry` instead of the process
//! default, so a scrape only ever sees the two domain metrics (no runtime or
//! process collectors) and tests can run isolated instances side by side.
//!
//! Series are keyed by the full `(set, type)` label tuple. A set that changes
//! type keeps its old series, and a set that disappears keeps its last value.

use prometheus::core::Collector;
use prometheus::{Encoder, IntCounter, IntGaugeVec, Opts, Registry, TextEncoder};

use ipset_exporter_core::error::{ExporterError, Result};

pub const NAMESPACE: &str = "ipset";
const ENTRIES_NAME: &str = "entries_count";
const ENTRIES_HELP: &str = "The total number of entries in an ipset";
const ERRORS_NAME: &str = "update_errors_total";
const ERRORS_HELP: &str = "The total number of errors encountered during ipset updates.";
const LABELS: [&str; 2] = ["set", "type"];

pub struct ExporterMetrics {
    registry: Registry,
    entries: IntGaugeVec,
    update_errors: IntCounter,
}

impl ExporterMetrics {
    pub fn new() -> Result<Self> {
        let entries = IntGaugeVec::new(
            Opts::new(ENTRIES_NAME, ENTRIES_HELP).namespace(NAMESPACE),
            &LABELS,
        )
        .map_err(|e| ExporterError::Registration(format!("{NAMESPACE}_{ENTRIES_NAME}: {e}")))?;

        let update_errors = IntCounter::with_opts(
            Opts::new(ERRORS_NAME, ERRORS_HELP).namespace(NAMESPACE),
        )
        .map_err(|e| ExporterError::Registration(format!("{NAMESPACE}_{ERRORS_NAME}: {e}")))?;

        Ok(Self {
            registry: Registry::new(),
            entries,
            update_errors,
        })
    }

    /// Bind both instruments to the registry. Safe to call more than once.
    pub fn register(&self) -> Result<()> {
        register_once(&self.registry, Box::new(self.entries.clone()))?;
        register_once(&self.registry, Box::new(self.update_errors.clone()))?;
        Ok(())
    }

    /// Upsert the entry count for one `(set, type)` series.
    pub fn record_set(&self, name: &str, set_type: &str, entry_count: u64) {
        let value = i64::try_from(entry_count).unwrap_or(i64::MAX);
        self.entries.with_label_values(&[name, set_type]).set(value);
    }

    pub fn record_failure(&self) {
        self.update_errors.inc();
    }

    pub fn update_errors(&self) -> u64 {
        self.update_errors.get()
    }

    /// Current value of a series, without creating it.
    pub fn entries(&self, name: &str, set_type: &str) -> Option<i64> {
        self.entries
            .collect()
            .iter()
            .flat_map(|mf| mf.get_metric())
            .find(|m| {
                let labels = m.get_label();
                labels.iter().any(|l| l.get_name() == "set" && l.get_value() == name)
                    && labels
                        .iter()
                        .any(|l| l.get_name() == "type" && l.get_value() == set_type)
            })
            .map(|m| m.get_gauge().get_value() as i64)
    }

    /// Number of `(set, type)` series currently exposed.
    pub fn series_count(&self) -> usize {
        self.entries
            .collect()
            .iter()
            .map(|mf| mf.get_metric().len())
            .sum()
    }

    /// Render everything registered in the Prometheus text format.
    pub fn render(&self) -> Result<String> {
        let encoder = TextEncoder::new();
        let families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder
            .encode(&families, &mut buffer)
            .map_err(|e| ExporterError::Internal(format!("encode metrics failed: {e}")))?;
        String::from_utf8(buffer)
            .map_err(|e| ExporterError::Internal(format!("metrics were not valid UTF-8: {e}")))
    }

    pub fn content_type(&self) -> &'static str {
        prometheus::TEXT_FORMAT
    }
}

fn register_once(registry: &Registry, collector: Box<dyn Collector>) -> Result<()> {
    match registry.register(collector) {
        Ok(()) | Err(prometheus::Error::AlreadyReg) => Ok(()),
        Err(e) => Err(ExporterError::Registration(e.to_string())),
    }
}
