/// One observed IP set at a point in time.
///
/// Produced fresh by every listing and folded into the metrics registry;
/// never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetSnapshot {
    pub name: String,
    /// Set type tag as reported by the kernel, e.g. `hash:ip` or `bitmap:port`.
    pub set_type: String,
    pub entry_count: u64,
}

impl SetSnapshot {
    pub fn new(name: impl Into<String>, set_type: impl Into<String>, entry_count: u64) -> Self {
        Self {
            name: name.into(),
            set_type: set_type.into(),
            entry_count,
        }
    }
}
