//! Exporter config loader (strict parsing).

pub mod schema;

use std::fs;
use std::path::Path;
use std::time::Duration;

use ipset_exporter_core::error::{ExporterError, Result};

pub use schema::{AppSection, ExporterConfig, IpsetSection};

/// Runtime view of the configuration consumed by the lifecycle.
#[derive(Debug, Clone)]
pub struct ExportConfig {
    pub names: Vec<String>,
    pub refresh_interval: Duration,
    pub listen_host: String,
    pub listen_port: u16,
}

impl ExporterConfig {
    pub fn export_config(&self) -> ExportConfig {
        ExportConfig {
            names: self.ipset.names.clone(),
            refresh_interval: Duration::from_secs(self.ipset.update_interval),
            listen_host: self.app.host.clone(),
            listen_port: self.app.port,
        }
    }
}

pub fn load_from_file(path: impl AsRef<Path>) -> Result<ExporterConfig> {
    let path = path.as_ref();
    let s = fs::read_to_string(path).map_err(|e| {
        ExporterError::Config(format!("read config failed ({}): {e}", path.display()))
    })?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<ExporterConfig> {
    let cfg: ExporterConfig = serde_yaml::from_str(s)
        .map_err(|e| ExporterError::Config(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}
