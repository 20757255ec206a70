//! Observability surface exported to scrapers.
//!
//! Domain metrics only; see `metrics` for the instrument definitions.

pub mod metrics;

pub use metrics::ExporterMetrics;
