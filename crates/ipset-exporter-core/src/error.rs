//! Shared error type across ipset-exporter crates.

use std::time::Duration;

use thiserror::Error;

/// Operator-facing error classes (stable, used in logs).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// One refresh cycle failed; counted and retried on the next tick.
    TransientCollection,
    /// Startup failed; the process must not keep serving.
    Boot,
    /// Graceful shutdown overran its deadline.
    ShutdownTimeout,
    /// Configuration or log level rejected.
    Config,
    /// Internal failure (task panic, encoder failure).
    Internal,
}

impl ErrorClass {
    /// String representation used in structured log fields.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorClass::TransientCollection => "TRANSIENT_COLLECTION",
            ErrorClass::Boot => "BOOT",
            ErrorClass::ShutdownTimeout => "SHUTDOWN_TIMEOUT",
            ErrorClass::Config => "CONFIG",
            ErrorClass::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, ExporterError>;

/// Unified error type used by core and exporter.
#[derive(Debug, Error)]
pub enum ExporterError {
    #[error("ipset collection failed: {0}")]
    Collection(String),
    #[error("malformed ipset listing: {0}")]
    Listing(String),
    #[error("invalid config: {0}")]
    Config(String),
    #[error("metric registration failed: {0}")]
    Registration(String),
    #[error("failed to bind {addr}: {reason}")]
    Bind { addr: String, reason: String },
    #[error("shutdown did not complete within {0:?}")]
    ShutdownTimeout(Duration),
    #[error("internal: {0}")]
    Internal(String),
}

impl ExporterError {
    /// Map the error to its operational class.
    pub fn class(&self) -> ErrorClass {
        match self {
            ExporterError::Collection(_) | ExporterError::Listing(_) => {
                ErrorClass::TransientCollection
            }
            ExporterError::Config(_) => ErrorClass::Config,
            ExporterError::Registration(_) | ExporterError::Bind { .. } => ErrorClass::Boot,
            ExporterError::ShutdownTimeout(_) => ErrorClass::ShutdownTimeout,
            ExporterError::Internal(_) => ErrorClass::Internal,
        }
    }
}
