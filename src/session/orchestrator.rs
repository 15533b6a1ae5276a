//! The session orchestrator: four ways to start a session.

use std::net::SocketAddr;

use tracing::{debug, info};

use crate::relay::{AllocationManager, JoinCode, Region, RelayError, RelayService};
use crate::transport::{
    ConnectionData, ConnectionHandle, NetworkDriver, TransportEndpoint, TransportError,
};

use super::config::SessionConfig;
use super::error::SessionError;

/// Composes an [`AllocationManager`] and a [`TransportEndpoint`] into
/// the four session-start operations: standard host, standard client,
/// relay host, relay client.
///
/// Each start operation is a terminal transition for "session start",
/// not resumable mid-flight. The orchestrator resolves relay usage
/// first and, when relayed, awaits allocation before touching the
/// transport.
pub struct SessionOrchestrator<S: RelayService, D: NetworkDriver> {
    allocations: AllocationManager<S>,
    endpoint: TransportEndpoint<D>,
    config: SessionConfig,
    use_relay: bool,
}

impl<S: RelayService, D: NetworkDriver> SessionOrchestrator<S, D> {
    /// Create an orchestrator over the given relay service client.
    pub fn new(service: S, config: SessionConfig) -> Self {
        Self {
            allocations: AllocationManager::new(service),
            endpoint: TransportEndpoint::new(),
            config,
            use_relay: false,
        }
    }

    /// Whether sessions route through the relay service.
    pub fn is_relay_enabled(&self) -> bool {
        self.use_relay
    }

    /// Force relay routing on or off for subsequent starts.
    pub fn set_relay_enabled(&mut self, enabled: bool) {
        self.use_relay = enabled;
    }

    /// The allocation manager (allocations, join code, service client).
    pub fn allocations(&self) -> &AllocationManager<S> {
        &self.allocations
    }

    /// The transport endpoint.
    pub fn endpoint(&self) -> &TransportEndpoint<D> {
        &self.endpoint
    }

    /// The transport endpoint, mutably (per-tick barrier, drain,
    /// scheduling, sends).
    pub fn endpoint_mut(&mut self) -> &mut TransportEndpoint<D> {
        &mut self.endpoint
    }

    /// The join code of the active relay session, if any.
    pub async fn join_code(&self) -> Option<JoinCode> {
        self.allocations.join_code().await
    }

    /// Ensures relay is disabled, then starts the server listening on
    /// the configured address.
    pub async fn start_standard_server(&mut self) -> Result<(), SessionError> {
        self.use_relay = false;
        let target = ConnectionData::direct(self.config.listen_address);
        self.listen(target).await
    }

    /// Ensures relay is disabled, then starts a host: a server with a
    /// local client alongside it in the calling framework.
    ///
    /// Transport-wise this is identical to
    /// [`start_standard_server`](Self::start_standard_server); the
    /// local client never crosses the network.
    pub async fn start_standard_host(&mut self) -> Result<(), SessionError> {
        self.use_relay = false;
        let target = ConnectionData::direct(self.config.listen_address);
        self.listen(target).await
    }

    /// Ensures relay is disabled, then connects to a server at a plain
    /// address.
    pub async fn start_standard_client(
        &mut self,
        address: SocketAddr,
    ) -> Result<ConnectionHandle, SessionError> {
        self.use_relay = false;
        self.connect(ConnectionData::direct(address)).await
    }

    /// Ensures relay is enabled, allocates a relay server sized for
    /// `max_players`, then starts listening through the allocation.
    ///
    /// Returns the join code to share with clients. If allocation
    /// fails the transport is never started and the failure propagates
    /// unchanged; if transport start fails afterwards the allocation
    /// is left intact, so the caller may retry transport start without
    /// re-allocating.
    pub async fn start_relay_host(
        &mut self,
        max_players: u32,
        region_id: Option<&str>,
    ) -> Result<JoinCode, SessionError> {
        self.use_relay = true;
        let code = self
            .allocations
            .allocate_server(max_players, region_id)
            .await?;
        let allocation = self.allocations.server_allocation().await.ok_or_else(|| {
            SessionError::TransportStart(TransportError::InvalidState(
                "allocation missing after successful allocate".into(),
            ))
        })?;
        self.listen(allocation.session_data().into()).await?;
        info!(code = %code, "relay host session started");
        Ok(code)
    }

    /// Ensures relay is enabled, resolves `code`, then connects
    /// through the resolved allocation.
    ///
    /// Failure at either step aborts the whole operation; no retry is
    /// attempted internally.
    pub async fn join_relay_server(
        &mut self,
        code: &str,
    ) -> Result<ConnectionHandle, SessionError> {
        self.use_relay = true;
        let allocation = self.allocations.resolve_join_code(code).await?;
        let connection = self.connect(allocation.session_data().into()).await?;
        info!(code, "relay client session started");
        Ok(connection)
    }

    /// Fetch the available relay regions.
    pub async fn list_relay_regions(&self) -> Result<Vec<Region>, RelayError> {
        self.allocations.list_regions().await
    }

    async fn listen(&mut self, target: ConnectionData) -> Result<(), SessionError> {
        self.ensure_driver()?;
        self.endpoint
            .start_listening(&target)
            .await
            .map_err(SessionError::TransportStart)?;
        debug!(relay = self.use_relay, "session listening");
        Ok(())
    }

    async fn connect(&mut self, target: ConnectionData) -> Result<ConnectionHandle, SessionError> {
        self.ensure_driver()?;
        self.endpoint
            .start_connecting(&target)
            .await
            .map_err(SessionError::TransportStart)
    }

    fn ensure_driver(&mut self) -> Result<(), SessionError> {
        if !self.endpoint.is_initialized() {
            self.endpoint
                .create_driver(self.config.driver.clone())
                .map_err(SessionError::TransportStart)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{Flag, MockDriver, ScriptedRelay};
    use crate::transport::EndpointMode;

    fn orchestrator() -> SessionOrchestrator<ScriptedRelay, MockDriver> {
        SessionOrchestrator::new(ScriptedRelay::default(), SessionConfig::default())
    }

    #[tokio::test]
    async fn test_relay_host_allocates_then_listens() {
        let mut session = orchestrator();

        let code = session.start_relay_host(4, Some("us-east")).await.unwrap();
        assert_eq!(code.as_str(), "ABC123");
        assert!(session.is_relay_enabled());
        assert_eq!(session.endpoint().mode(), EndpointMode::Listening);

        let allocation = session.allocations().server_allocation().await.unwrap();
        assert_eq!(allocation.allocation_id, "A1");
        assert_eq!(session.join_code().await, Some(code));

        // The endpoint listens through the allocation's session data.
        let target = session.endpoint().driver().unwrap().listen_target.clone();
        assert_eq!(target, Some(allocation.session_data().into()));
    }

    #[tokio::test]
    async fn test_join_relay_server_connects_with_peer_data() {
        let mut session = orchestrator();

        session.join_relay_server("ABC123").await.unwrap();
        assert!(session.is_relay_enabled());
        assert_eq!(session.endpoint().mode(), EndpointMode::Connecting);

        let join = session.allocations().join_allocation().await.unwrap();
        let target = session.endpoint().driver().unwrap().connect_target.clone();
        assert_eq!(target, Some(join.session_data().into()));
    }

    #[tokio::test]
    async fn test_standard_server_never_touches_relay() {
        let mut session = orchestrator();

        session.start_standard_server().await.unwrap();
        assert!(!session.is_relay_enabled());
        assert_eq!(session.endpoint().mode(), EndpointMode::Listening);

        let calls = session.allocations().service().calls();
        assert_eq!(calls.create, 0);
        assert_eq!(calls.join_code, 0);
        assert_eq!(calls.join, 0);
        assert_eq!(calls.regions, 0);
    }

    #[tokio::test]
    async fn test_standard_host_listens_direct() {
        let mut session = orchestrator();
        session.set_relay_enabled(true);

        session.start_standard_host().await.unwrap();
        assert!(!session.is_relay_enabled());

        let target = session.endpoint().driver().unwrap().listen_target.clone();
        assert_eq!(
            target,
            Some(ConnectionData::direct(SessionConfig::default().listen_address))
        );
    }

    #[tokio::test]
    async fn test_standard_client_connects_to_plain_address() {
        let mut session = orchestrator();
        let addr: SocketAddr = "192.0.2.1:7777".parse().unwrap();

        let handle = session.start_standard_client(addr).await.unwrap();
        assert!(session.endpoint().is_valid_connection(handle));

        let target = session.endpoint().driver().unwrap().connect_target.clone();
        assert_eq!(target, Some(ConnectionData::direct(addr)));
    }

    #[tokio::test]
    async fn test_allocation_failure_leaves_transport_unstarted() {
        let service = ScriptedRelay {
            fail_create: Flag::new(true),
            ..ScriptedRelay::default()
        };
        let mut session: SessionOrchestrator<_, MockDriver> =
            SessionOrchestrator::new(service, SessionConfig::default());

        let err = session.start_relay_host(4, None).await.unwrap_err();
        assert!(matches!(
            err,
            SessionError::Relay(RelayError::AllocationCreate(_))
        ));
        assert!(!session.endpoint().is_initialized());
    }

    #[tokio::test]
    async fn test_transport_failure_keeps_allocation_for_retry() {
        let mut session = orchestrator();

        // Prime the endpoint with a driver scripted to refuse listen.
        session
            .endpoint_mut()
            .create_driver(SessionConfig::default().driver)
            .unwrap();
        session.endpoint_mut().driver_mut().unwrap().fail_listen = true;

        let err = session.start_relay_host(4, None).await.unwrap_err();
        assert!(matches!(err, SessionError::TransportStart(_)));

        // Allocation survives; a transport-only retry succeeds.
        let code = session.join_code().await.unwrap();
        assert_eq!(code.as_str(), "ABC123");
        let allocation = session.allocations().server_allocation().await.unwrap();

        session.endpoint_mut().driver_mut().unwrap().fail_listen = false;
        session
            .endpoint_mut()
            .start_listening(&allocation.session_data().into())
            .await
            .unwrap();
        assert_eq!(session.endpoint().mode(), EndpointMode::Listening);
    }

    #[tokio::test]
    async fn test_join_failure_aborts_whole_operation() {
        let service = ScriptedRelay {
            fail_join: Flag::new(true),
            ..ScriptedRelay::default()
        };
        let mut session: SessionOrchestrator<_, MockDriver> =
            SessionOrchestrator::new(service, SessionConfig::default());

        let err = session.join_relay_server("STALE1").await.unwrap_err();
        assert!(matches!(
            err,
            SessionError::Relay(RelayError::AllocationLookup(_))
        ));
        assert!(!session.endpoint().is_initialized());
    }

    #[tokio::test]
    async fn test_region_passthrough() {
        let session = orchestrator();
        let regions = session.list_relay_regions().await.unwrap();
        assert!(!regions.is_empty());
        assert!(regions.iter().any(|r| r.id == "us-east"));
    }
}
