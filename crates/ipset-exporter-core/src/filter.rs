//! Export filter.
//!
//! Decides which observed sets end up in the registry. Matching is literal:
//! no globbing, no prefixes. The single wildcard is the `all` sentinel.

/// Sentinel entry that exports every observed set.
pub const ALL_SETS: &str = "all";

/// Returns true if `observed` should be exported under `names`.
pub fn should_export<S: AsRef<str>>(names: &[S], observed: &str) -> bool {
    names.iter().any(|n| {
        let n = n.as_ref();
        n == ALL_SETS || n == observed
    })
}
