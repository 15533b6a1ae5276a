//! Scripted collaborators for unit tests: a relay service with
//! switchable failures and call counting, and a recording mock driver.

use std::net::SocketAddr;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use crate::relay::{JoinAllocation, JoinCode, Region, RelayService, RelayServiceError, ServerAllocation};
use crate::transport::{
    ConnectionData, DriverSettings, EventProducer, NetworkDriver, PipelineHandle, PipelineStage,
    TransportError,
};

/// A settable boolean usable through a shared reference.
#[derive(Debug, Default)]
pub struct Flag(AtomicBool);

impl Flag {
    pub fn new(value: bool) -> Self {
        Self(AtomicBool::new(value))
    }

    pub fn set(&self, value: bool) {
        self.0.store(value, Ordering::SeqCst);
    }

    pub fn get(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Per-operation call counts observed by a [`ScriptedRelay`].
#[derive(Debug, Default, Clone, Copy)]
pub struct RelayCalls {
    pub create: u32,
    pub join_code: u32,
    pub join: u32,
    pub regions: u32,
    pub abandon: u32,
}

/// A relay service with scripted responses, switchable failures, and
/// call counting.
#[derive(Debug)]
pub struct ScriptedRelay {
    pub allocation_id: String,
    pub join_code: String,
    pub relay_server: SocketAddr,
    /// Artificial latency before every response.
    pub respond_after: Duration,
    pub fail_create: Flag,
    pub fail_join_code: Flag,
    pub fail_join: Flag,
    pub fail_regions: Flag,
    pub counts: Mutex<RelayCalls>,
}

impl Default for ScriptedRelay {
    fn default() -> Self {
        Self {
            allocation_id: "A1".into(),
            join_code: "ABC123".into(),
            relay_server: "10.0.0.9:4000".parse().unwrap(),
            respond_after: Duration::ZERO,
            fail_create: Flag::default(),
            fail_join_code: Flag::default(),
            fail_join: Flag::default(),
            fail_regions: Flag::default(),
            counts: Mutex::new(RelayCalls::default()),
        }
    }
}

impl ScriptedRelay {
    /// Snapshot of the call counts so far.
    pub fn calls(&self) -> RelayCalls {
        *self.counts.lock().unwrap()
    }

    async fn respond(&self) {
        if !self.respond_after.is_zero() {
            tokio::time::sleep(self.respond_after).await;
        }
    }
}

impl RelayService for ScriptedRelay {
    async fn create_allocation(
        &self,
        _max_players: u32,
        _region_id: Option<&str>,
    ) -> Result<ServerAllocation, RelayServiceError> {
        self.counts.lock().unwrap().create += 1;
        self.respond().await;
        if self.fail_create.get() {
            return Err(RelayServiceError::Unreachable("scripted outage".into()));
        }
        Ok(ServerAllocation {
            allocation_id: self.allocation_id.clone(),
            relay_server: self.relay_server,
            key: vec![0xA5; 16],
            connection_data: vec![1, 2, 3, 4],
        })
    }

    async fn get_join_code(&self, allocation_id: &str) -> Result<JoinCode, RelayServiceError> {
        self.counts.lock().unwrap().join_code += 1;
        self.respond().await;
        if self.fail_join_code.get() {
            return Err(RelayServiceError::Unreachable("scripted outage".into()));
        }
        if allocation_id != self.allocation_id {
            return Err(RelayServiceError::Rejected(format!(
                "unknown allocation: {allocation_id}"
            )));
        }
        Ok(JoinCode::new(self.join_code.clone()))
    }

    async fn join_allocation(&self, join_code: &str) -> Result<JoinAllocation, RelayServiceError> {
        self.counts.lock().unwrap().join += 1;
        self.respond().await;
        if self.fail_join.get() {
            return Err(RelayServiceError::Rejected("invalid join code".into()));
        }
        if join_code != self.join_code {
            return Err(RelayServiceError::Rejected(format!(
                "unknown join code: {join_code}"
            )));
        }
        Ok(JoinAllocation {
            allocation_id: self.allocation_id.clone(),
            relay_server: self.relay_server,
            key: vec![0xA5; 16],
            connection_data: vec![5, 6, 7, 8],
            host_connection_data: vec![1, 2, 3, 4],
        })
    }

    async fn list_regions(&self) -> Result<Vec<Region>, RelayServiceError> {
        self.counts.lock().unwrap().regions += 1;
        self.respond().await;
        if self.fail_regions.get() {
            return Err(RelayServiceError::Unreachable("scripted outage".into()));
        }
        Ok(vec![
            Region {
                id: "us-east".into(),
                description: "US East".into(),
            },
            Region {
                id: "eu-west".into(),
                description: "Europe West".into(),
            },
        ])
    }

    async fn abandon_allocation(&self, _allocation_id: &str) -> Result<(), RelayServiceError> {
        self.counts.lock().unwrap().abandon += 1;
        Ok(())
    }
}

/// An event a [`MockDriver`] will emit during its next processing
/// round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingEvent {
    Connected(u64),
    Disconnected(u64),
    Data(u64, Vec<u8>),
}

/// A driver that records every call and emits scripted events.
#[derive(Debug)]
pub struct MockDriver {
    pub settings: DriverSettings,
    pub pipelines: Vec<Vec<PipelineStage>>,
    pub listen_target: Option<ConnectionData>,
    pub connect_target: Option<ConnectionData>,
    pub fail_listen: bool,
    pub fail_connect: bool,
    pub pending_events: Vec<PendingEvent>,
    pub sent: Vec<(u64, PipelineHandle, Vec<u8>)>,
    next_connection_id: u64,
}

impl NetworkDriver for MockDriver {
    fn create(settings: &DriverSettings) -> Result<Self, TransportError> {
        Ok(Self {
            settings: settings.clone(),
            pipelines: Vec::new(),
            listen_target: None,
            connect_target: None,
            fail_listen: false,
            fail_connect: false,
            pending_events: Vec::new(),
            sent: Vec::new(),
            next_connection_id: 1,
        })
    }

    fn create_pipeline(
        &mut self,
        stages: &[PipelineStage],
    ) -> Result<PipelineHandle, TransportError> {
        self.pipelines.push(stages.to_vec());
        Ok(PipelineHandle::new(self.pipelines.len() as u32 - 1))
    }

    async fn listen(&mut self, target: &ConnectionData) -> Result<(), TransportError> {
        if self.fail_listen {
            return Err(TransportError::StartFailed("scripted listen failure".into()));
        }
        self.listen_target = Some(target.clone());
        Ok(())
    }

    async fn connect(&mut self, target: &ConnectionData) -> Result<u64, TransportError> {
        if self.fail_connect {
            return Err(TransportError::StartFailed(
                "scripted connect failure".into(),
            ));
        }
        self.connect_target = Some(target.clone());
        let id = self.next_connection_id;
        self.next_connection_id += 1;
        Ok(id)
    }

    async fn send(
        &mut self,
        connection_id: u64,
        pipeline: PipelineHandle,
        payload: &[u8],
    ) -> Result<(), TransportError> {
        self.sent.push((connection_id, pipeline, payload.to_vec()));
        Ok(())
    }

    async fn process(&mut self, events: EventProducer) -> Result<(), TransportError> {
        for event in std::mem::take(&mut self.pending_events) {
            match event {
                PendingEvent::Connected(id) => events.connected(id),
                PendingEvent::Disconnected(id) => events.disconnected(id),
                PendingEvent::Data(id, payload) => events.data(id, payload),
            }
        }
        Ok(())
    }
}
