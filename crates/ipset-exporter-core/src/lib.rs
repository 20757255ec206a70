//! ipset-exporter core: transport-agnostic primitives shared by the exporter.
//!
//! This crate defines the observed set model, the export filter, the parser for
//! the `ipset` tool's terse listing, and the error surface. It carries no
//! runtime, HTTP, or metrics dependencies so it can be tested in isolation.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! All fallible paths must surface as `ExporterError`/`Result` so a malformed
//! listing never takes the exporter down.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod filter;
pub mod listing;
pub mod snapshot;

/// Shared result type.
pub use error::{ErrorClass, ExporterError, Result};
pub use filter::{should_export, ALL_SETS};
pub use snapshot::SetSnapshot;
