//! Top-level error type composing the per-layer errors.

use thiserror::Error;

use crate::relay::RelayError;
use crate::session::SessionError;
use crate::transport::TransportError;

/// Top-level relaykit errors.
#[derive(Debug, Error)]
pub enum RelayKitError {
    /// Transport error.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// Relay allocation error.
    #[error("relay error: {0}")]
    Relay(#[from] RelayError),

    /// Session orchestration error.
    #[error("session error: {0}")]
    Session(#[from] SessionError),

    /// I/O error.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}
