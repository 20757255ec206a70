//! Parser for the `ipset list` text output (panic-free).
//!
//! Each set is a block of `Key: value` header lines opened by `Name:`:
//!
//! ```text
//! Name: blocklist
//! Type: hash:ip
//! Revision: 4
//! Header: family inet hashsize 1024 maxelem 65536
//! Size in memory: 504
//! References: 1
//! Number of entries: 3
//! ```
//!
//! `-terse` output stops after the header. The full output adds a `Members:`
//! line followed by one member per line; when `Number of entries` is missing
//! (older tools) the members are counted instead.

use tracing::trace;

use crate::error::{ExporterError, Result};
use crate::snapshot::SetSnapshot;

#[derive(Debug)]
struct Block {
    name: String,
    set_type: Option<String>,
    entries: Option<u64>,
    members: u64,
    saw_members: bool,
}

impl Block {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            set_type: None,
            entries: None,
            members: 0,
            saw_members: false,
        }
    }

    fn finish(self) -> Result<SetSnapshot> {
        if self.name.is_empty() {
            return Err(ExporterError::Listing("set with empty name".into()));
        }
        let set_type = self.set_type.ok_or_else(|| {
            ExporterError::Listing(format!("set {}: missing Type header", self.name))
        })?;
        let entry_count = match (self.entries, self.saw_members) {
            (Some(n), _) => n,
            (None, true) => self.members,
            (None, false) => {
                return Err(ExporterError::Listing(format!(
                    "set {}: missing entry count",
                    self.name
                )))
            }
        };
        Ok(SetSnapshot {
            name: self.name,
            set_type,
            entry_count,
        })
    }
}

/// Parse a full or terse `ipset list` output into snapshots.
///
/// An empty listing (no sets defined) is valid and yields no snapshots.
pub fn parse_listing(text: &str) -> Result<Vec<SetSnapshot>> {
    let mut out = Vec::new();
    let mut current: Option<Block> = None;
    let mut in_members = false;

    for (idx, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() {
            in_members = false;
            continue;
        }

        if let Some(name) = line.strip_prefix("Name:") {
            if let Some(done) = current.take() {
                out.push(done.finish()?);
            }
            current = Some(Block::new(name.trim()));
            in_members = false;
            continue;
        }

        let Some(block) = current.as_mut() else {
            return Err(ExporterError::Listing(format!(
                "line {}: content before first Name header",
                idx + 1
            )));
        };

        if in_members {
            block.members += 1;
            continue;
        }

        match line.split_once(':') {
            Some(("Type", v)) => block.set_type = Some(v.trim().to_string()),
            Some(("Number of entries", v)) => {
                let n = v.trim().parse::<u64>().map_err(|_| {
                    ExporterError::Listing(format!(
                        "set {}: invalid entry count {:?}",
                        block.name,
                        v.trim()
                    ))
                })?;
                block.entries = Some(n);
            }
            Some(("Members", _)) => {
                block.saw_members = true;
                in_members = true;
            }
            _ => trace!(set = %block.name, line = %line, "skipping listing header"),
        }
    }

    if let Some(done) = current.take() {
        out.push(done.finish()?);
    }
    Ok(out)
}
