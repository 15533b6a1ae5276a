//! Error types for the transport layer.

use thiserror::Error;

/// Errors that can occur in the transport layer.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Driver construction failed (invalid settings or resource
    /// allocation failure).
    #[error("driver init failed: {0}")]
    DriverInit(String),

    /// Pipeline derivation failed.
    #[error("pipeline creation failed: {0}")]
    PipelineCreation(String),

    /// API misuse, e.g. double-dispose or operating on an
    /// uninitialized endpoint. Not recoverable by retrying the same
    /// call; the caller must fix call ordering.
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// Listen or connect failed.
    #[error("transport start failed: {0}")]
    StartFailed(String),

    /// Outgoing send failed.
    #[error("send failed: {0}")]
    Send(String),

    /// Background processing round failed.
    #[error("background processing failed: {0}")]
    Processing(String),

    /// I/O error.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}
