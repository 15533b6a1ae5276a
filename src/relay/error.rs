//! Error types for the relay layer.

use thiserror::Error;

use super::service::RelayServiceError;

/// Errors that can occur in the allocation workflows.
///
/// Service-backed failures are never retried here: retry policy (pick
/// another region, back off, abandon) is the application's concern.
#[derive(Debug, Error)]
pub enum RelayError {
    /// Server allocation failed, either at the allocation call or the
    /// dependent join-code fetch. No partial allocation is retained.
    #[error("relay allocation failed: {0}")]
    AllocationCreate(#[source] RelayServiceError),

    /// A join code could not be resolved (invalid, expired, or the
    /// service was unreachable).
    #[error("join code lookup failed: {0}")]
    AllocationLookup(#[source] RelayServiceError),

    /// The region list could not be fetched.
    #[error("region list failed: {0}")]
    RegionList(#[source] RelayServiceError),

    /// Another allocate-or-resolve workflow is already in flight on
    /// this manager. Serialize conflicting calls; retrying the same
    /// call concurrently will not help.
    #[error("conflicting allocation workflow already in flight")]
    ConcurrentAllocation,

    /// The request was rejected before reaching the service.
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}
