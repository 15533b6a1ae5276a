//! Error types for session orchestration.
//!
//! The variant identifies which phase of a session start failed, so
//! the caller can decide whether to retry allocation, retry transport
//! start only, or abandon.

use thiserror::Error;

use crate::relay::RelayError;
use crate::transport::TransportError;

/// Errors that can occur while starting a session.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The allocation phase failed; the transport was never started.
    #[error("allocation phase failed: {0}")]
    Relay(#[from] RelayError),

    /// The transport phase failed. Any allocation obtained beforehand
    /// is left intact, so the caller may retry transport start without
    /// re-allocating.
    #[error("transport start failed: {0}")]
    TransportStart(#[source] TransportError),
}
