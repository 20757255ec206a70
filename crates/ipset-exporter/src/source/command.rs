//! Kernel-backed source that shells out to the `ipset` tool.
//!
//! Runs `<binary> list -terse` and parses the header blocks. The child is
//! killed if the listing future is dropped, so a cancelled refresh never
//! leaves a stray process behind.

use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use ipset_exporter_core::error::{ExporterError, Result};
use ipset_exporter_core::listing::parse_listing;
use ipset_exporter_core::SetSnapshot;

use super::StateSource;

#[derive(Debug, Clone)]
pub struct IpsetCommand {
    binary: String,
}

impl IpsetCommand {
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    pub fn binary(&self) -> &str {
        &self.binary
    }
}

impl Default for IpsetCommand {
    fn default() -> Self {
        Self::new("ipset")
    }
}

#[async_trait]
impl StateSource for IpsetCommand {
    fn kind(&self) -> &'static str {
        "ipset-command"
    }

    async fn list_all(&self) -> Result<Vec<SetSnapshot>> {
        let output = Command::new(&self.binary)
            .args(["list", "-terse"])
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| ExporterError::Collection(format!("spawn {} failed: {e}", self.binary)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ExporterError::Collection(format!(
                "{} list exited with {}: {}",
                self.binary,
                output.status,
                stderr.trim()
            )));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let sets = parse_listing(&stdout)?;
        debug!(binary = %self.binary, sets = sets.len(), "ipset listing parsed");
        Ok(sets)
    }
}
