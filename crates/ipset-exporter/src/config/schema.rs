use serde::Deserialize;
use ipset_exporter_core::error::{ExporterError, Result};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExporterConfig {
    #[serde(default)]
    pub app: AppSection,

    pub ipset: IpsetSection,
}

impl ExporterConfig {
    pub fn validate(&self) -> Result<()> {
        self.app.validate()?;
        self.ipset.validate()?;
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppSection {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for AppSection {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            log_level: default_log_level(),
        }
    }
}

impl AppSection {
    pub fn validate(&self) -> Result<()> {
        if self.host.trim().is_empty() {
            return Err(ExporterError::Config("app.host must not be empty".into()));
        }
        if self.port == 0 {
            return Err(ExporterError::Config("app.port must be between 1 and 65535".into()));
        }
        crate::logging::parse_level(&self.log_level)?;
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IpsetSection {
    /// Seconds between refreshes.
    #[serde(default = "default_update_interval")]
    pub update_interval: u64,

    pub names: Vec<String>,

    #[serde(default = "default_binary")]
    pub binary: String,
}

impl IpsetSection {
    pub fn validate(&self) -> Result<()> {
        if !(1..=86_400).contains(&self.update_interval) {
            return Err(ExporterError::Config(
                "ipset.update_interval must be between 1 and 86400 seconds".into(),
            ));
        }
        if self.names.is_empty() {
            return Err(ExporterError::Config(
                "ipset.names must not be empty (use \"all\" to export every set)".into(),
            ));
        }
        if self.names.iter().any(|n| n.is_empty()) {
            return Err(ExporterError::Config("ipset.names must not contain empty names".into()));
        }
        if self.binary.trim().is_empty() {
            return Err(ExporterError::Config("ipset.binary must not be empty".into()));
        }
        Ok(())
    }
}

fn default_host() -> String {
    "0.0.0.0".into()
}
fn default_port() -> u16 {
    9875
}
fn default_log_level() -> String {
    "info".into()
}
fn default_update_interval() -> u64 {
    30
}
fn default_binary() -> String {
    "ipset".into()
}
