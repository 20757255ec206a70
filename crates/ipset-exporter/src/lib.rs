//! ipset-exporter library entry.
//!
//! This crate wires the state sources, metrics registry, refresh loop, and
//! HTTP exposition server into one lifecycle. It is consumed by the binary
//! (`main.rs`) and by integration tests.

pub mod app_state;
pub mod cli;
pub mod config;
pub mod lifecycle;
pub mod logging;
pub mod obs;
pub mod ops;
pub mod refresh;
pub mod router;
pub mod server;
pub mod source;

pub use lifecycle::{Exporter, LifecycleState};
