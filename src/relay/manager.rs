//! The allocation manager: relay SDK calls wrapped into two
//! independent async workflows.

use tokio::sync::{Mutex, RwLock};
use tracing::{debug, warn};

use super::error::RelayError;
use super::models::{JoinAllocation, JoinCode, Region, ServerAllocation};
use super::service::RelayService;

/// Allocation state, reassigned wholesale under the write lock so
/// readers never observe a partially-updated allocation.
#[derive(Debug, Default)]
struct AllocationState {
    server: Option<ServerAllocation>,
    join: Option<JoinAllocation>,
    join_code: Option<JoinCode>,
}

/// Wraps the relay service's asynchronous allocation API into a small
/// state machine holding either a server allocation plus join code
/// (hosting) or a client allocation (joining).
///
/// At most one allocate-or-resolve workflow may be in flight at a
/// time; conflicting concurrent calls fail with
/// [`RelayError::ConcurrentAllocation`]. Region queries are
/// independent and never touch allocation state.
pub struct AllocationManager<S: RelayService> {
    service: S,
    state: RwLock<AllocationState>,
    /// Workflow guard: held across the service round trips of
    /// `allocate_server` and `resolve_join_code`.
    workflow: Mutex<()>,
}

impl<S: RelayService> AllocationManager<S> {
    /// Create a manager over the given relay service client.
    pub fn new(service: S) -> Self {
        Self {
            service,
            state: RwLock::new(AllocationState::default()),
            workflow: Mutex::new(()),
        }
    }

    /// Access the underlying service client.
    pub fn service(&self) -> &S {
        &self.service
    }

    /// Request a new server allocation sized for `max_players` and
    /// mint its join code.
    ///
    /// Two dependent service calls collapsed into one atomic-looking
    /// operation: a server allocation without a retrievable join code
    /// is useless, so a failed join-code fetch rolls the visible state
    /// back (nothing is stored) and attempts a best-effort remote
    /// release of the half-created allocation. On success the
    /// allocation and code are stored together and the code returned.
    pub async fn allocate_server(
        &self,
        max_players: u32,
        region_id: Option<&str>,
    ) -> Result<JoinCode, RelayError> {
        if max_players < 1 {
            return Err(RelayError::InvalidRequest(
                "max_players must be at least 1".into(),
            ));
        }
        let _workflow = self
            .workflow
            .try_lock()
            .map_err(|_| RelayError::ConcurrentAllocation)?;

        let allocation = self
            .service
            .create_allocation(max_players, region_id)
            .await
            .map_err(RelayError::AllocationCreate)?;
        debug!(allocation_id = %allocation.allocation_id, "server allocation created");

        let join_code = match self.service.get_join_code(&allocation.allocation_id).await {
            Ok(code) => code,
            Err(err) => {
                // The allocation is unusable without a code; release it
                // remotely if the service lets us, and report the fetch
                // failure either way.
                if let Err(release_err) = self
                    .service
                    .abandon_allocation(&allocation.allocation_id)
                    .await
                {
                    warn!(
                        allocation_id = %allocation.allocation_id,
                        error = %release_err,
                        "failed to release orphaned allocation"
                    );
                }
                return Err(RelayError::AllocationCreate(err));
            }
        };

        let mut state = self.state.write().await;
        state.server = Some(allocation);
        state.join_code = Some(join_code.clone());
        Ok(join_code)
    }

    /// Resolve a join code into a client-side allocation.
    ///
    /// Every call performs a fresh round trip; the result may
    /// legitimately differ between calls if the allocation was
    /// recreated upstream. On success the allocation and the code used
    /// are stored.
    pub async fn resolve_join_code(&self, code: &str) -> Result<JoinAllocation, RelayError> {
        let _workflow = self
            .workflow
            .try_lock()
            .map_err(|_| RelayError::ConcurrentAllocation)?;

        let allocation = self
            .service
            .join_allocation(code)
            .await
            .map_err(RelayError::AllocationLookup)?;
        debug!(allocation_id = %allocation.allocation_id, "join code resolved");

        let mut state = self.state.write().await;
        state.join = Some(allocation.clone());
        state.join_code = Some(JoinCode::new(code));
        Ok(allocation)
    }

    /// Fetch the current region list.
    ///
    /// Finite, non-cached: repeated queries re-fetch. Failure leaves
    /// any previously known allocation untouched.
    pub async fn list_regions(&self) -> Result<Vec<Region>, RelayError> {
        self.service
            .list_regions()
            .await
            .map_err(RelayError::RegionList)
    }

    /// The current server allocation, if hosting through the relay.
    pub async fn server_allocation(&self) -> Option<ServerAllocation> {
        self.state.read().await.server.clone()
    }

    /// The current client allocation, if joined through the relay.
    pub async fn join_allocation(&self) -> Option<JoinAllocation> {
        self.state.read().await.join.clone()
    }

    /// The join code of the active relay session, host or client side.
    pub async fn join_code(&self) -> Option<JoinCode> {
        self.state.read().await.join_code.clone()
    }
}
