//! State sources: where set listings come from.
//!
//! The refresh loop only sees the [`StateSource`] trait, so the kernel-backed
//! implementation can be swapped for a canned one in tests.

pub mod canned;
pub mod command;

use async_trait::async_trait;

use ipset_exporter_core::error::Result;
use ipset_exporter_core::SetSnapshot;

pub use canned::CannedSource;
pub use command::IpsetCommand;

/// Lists every named set currently known to the kernel.
#[async_trait]
pub trait StateSource: Send + Sync {
    /// Short name used in logs.
    fn kind(&self) -> &'static str;
    async fn list_all(&self) -> Result<Vec<SetSnapshot>>;
}
