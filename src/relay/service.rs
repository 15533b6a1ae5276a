//! The relay service SDK seam.
//!
//! Implementations adapt a concrete relay SDK (REST client, in-memory
//! fake) to this trait; relaykit never speaks the relay wire protocol
//! itself.

use std::future::Future;

use thiserror::Error;

use super::models::{JoinAllocation, JoinCode, Region, ServerAllocation};

/// Failure reported by the relay service or its SDK.
///
/// Wrapped into [`RelayError`](super::RelayError) kinds by the
/// allocation manager.
#[derive(Debug, Error)]
pub enum RelayServiceError {
    /// The service rejected the request (bad region, unknown or
    /// expired join code, quota exceeded).
    #[error("request rejected: {0}")]
    Rejected(String),

    /// The service could not be reached.
    #[error("service unreachable: {0}")]
    Unreachable(String),

    /// The SDK failed locally (serialization, configuration).
    #[error("sdk failure: {0}")]
    Sdk(String),
}

/// Capability trait for the relay service's allocation API.
///
/// All operations are asynchronous network calls; all futures are
/// `Send` so workflows can run on any task.
pub trait RelayService: Send + Sync {
    /// Reserve a server allocation sized for `max_players`, optionally
    /// pinned to `region_id` (absent means service-default selection).
    fn create_allocation(
        &self,
        max_players: u32,
        region_id: Option<&str>,
    ) -> impl Future<Output = Result<ServerAllocation, RelayServiceError>> + Send;

    /// Mint the join code for an existing allocation.
    fn get_join_code(
        &self,
        allocation_id: &str,
    ) -> impl Future<Output = Result<JoinCode, RelayServiceError>> + Send;

    /// Resolve a join code into a client-side allocation.
    fn join_allocation(
        &self,
        join_code: &str,
    ) -> impl Future<Output = Result<JoinAllocation, RelayServiceError>> + Send;

    /// Fetch the current list of relay regions.
    fn list_regions(&self) -> impl Future<Output = Result<Vec<Region>, RelayServiceError>> + Send;

    /// Release a server allocation that will not be used.
    ///
    /// Called best-effort when a join-code fetch fails after a
    /// successful allocation. SDKs without a release endpoint keep the
    /// default no-op.
    fn abandon_allocation(
        &self,
        allocation_id: &str,
    ) -> impl Future<Output = Result<(), RelayServiceError>> + Send {
        let _ = allocation_id;
        async { Ok(()) }
    }
}
