//! Tracing subscriber setup.
//!
//! `RUST_LOG` takes precedence; otherwise the configured `app.log_level` is
//! applied to every target.

use tracing_subscriber::{filter::LevelFilter, fmt, EnvFilter};

use ipset_exporter_core::error::{ExporterError, Result};

/// Parse a level name, case-insensitively.
///
/// `fatal` and `panic` are accepted as aliases of `error` so existing config
/// files keep working.
pub fn parse_level(level: &str) -> Result<LevelFilter> {
    match level.trim().to_ascii_lowercase().as_str() {
        "trace" => Ok(LevelFilter::TRACE),
        "debug" => Ok(LevelFilter::DEBUG),
        "info" => Ok(LevelFilter::INFO),
        "warn" | "warning" => Ok(LevelFilter::WARN),
        "error" | "fatal" | "panic" => Ok(LevelFilter::ERROR),
        "off" => Ok(LevelFilter::OFF),
        _ => Err(ExporterError::Config(format!("invalid log level: {level:?}"))),
    }
}

/// Install the global subscriber at `level`.
pub fn init(level: &str) -> Result<()> {
    let level = parse_level(level)?;
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::default().add_directive(level.into()));

    fmt()
        .with_env_filter(filter)
        .try_init()
        .map_err(|e| ExporterError::Internal(format!("logger init failed: {e}")))
}
