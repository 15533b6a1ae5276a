//! The network driver capability seam.
//!
//! The driver owns the OS-level socket and event machinery; relaykit
//! consumes it through [`NetworkDriver`] and never reaches below it.
//! Packet fragmentation, ordering, and reliability live behind
//! [`PipelineHandle`]s derived from the driver at creation time.

use std::future::Future;
use std::net::SocketAddr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::constants::{DEFAULT_CONNECTION_TIMEOUT, PAYLOAD_CAPACITY};

use super::error::TransportError;
use super::events::EventProducer;

/// Settings for driver construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriverSettings {
    /// Timeout applied by the driver to unresponsive connections.
    /// Immutable after driver creation.
    pub connection_timeout: Duration,

    /// Maximum payload size applied to the fragmentation stage.
    pub max_payload_size: usize,
}

impl Default for DriverSettings {
    fn default() -> Self {
        Self {
            connection_timeout: DEFAULT_CONNECTION_TIMEOUT,
            max_payload_size: PAYLOAD_CAPACITY,
        }
    }
}

impl DriverSettings {
    /// Validate the settings, returning a [`TransportError::DriverInit`]
    /// describing the first invalid field.
    pub fn validate(&self) -> Result<(), TransportError> {
        if self.max_payload_size == 0 {
            return Err(TransportError::DriverInit(
                "max payload size must be greater than zero".into(),
            ));
        }
        if self.connection_timeout.is_zero() {
            return Err(TransportError::DriverInit(
                "connection timeout must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}

/// A stage in a delivery pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    /// Fragments payloads larger than the MTU and reassembles them.
    Fragmentation,
    /// In-order, exactly-once-effective delivery with retransmission.
    ReliableSequenced,
    /// Sequenced but droppable: late or duplicate messages are
    /// discarded, nothing is retransmitted.
    UnreliableSequenced,
}

/// Handle to a configured pipeline on a driver.
///
/// Valid for the lifetime of the driver that created it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PipelineHandle(u32);

impl PipelineHandle {
    /// Create a handle from a driver-assigned pipeline index.
    pub fn new(index: u32) -> Self {
        Self(index)
    }

    /// The driver-assigned pipeline index.
    pub fn index(&self) -> u32 {
        self.0
    }
}

/// Connection data used by a relayed endpoint to attach to its
/// allocation, minted by the relay service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelaySessionData {
    /// The relay server to dial.
    pub relay_server: SocketAddr,
    /// Identifier of the backing allocation.
    pub allocation_id: String,
    /// Security key material for the relay handshake.
    pub key: Vec<u8>,
    /// This endpoint's connection data blob.
    pub connection_data: Vec<u8>,
    /// The host's connection data blob; present only on the client
    /// side of a relayed session.
    pub host_connection_data: Option<Vec<u8>>,
}

/// Where the transport should listen or connect.
///
/// Derived from an allocation when the session is relayed, or from a
/// plain address otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConnectionData {
    /// A plain socket address, no relay involved.
    Direct {
        /// The address to bind (host) or dial (client).
        address: SocketAddr,
    },
    /// Relay-brokered connection data.
    Relay(RelaySessionData),
}

impl ConnectionData {
    /// Connection data for a direct (non-relayed) session.
    pub fn direct(address: SocketAddr) -> Self {
        Self::Direct { address }
    }

    /// True if this connection routes through a relay.
    pub fn is_relayed(&self) -> bool {
        matches!(self, Self::Relay(_))
    }
}

impl From<RelaySessionData> for ConnectionData {
    fn from(data: RelaySessionData) -> Self {
        Self::Relay(data)
    }
}

/// Capability trait for the low-level transport driver.
///
/// A driver owns the OS-level socket and event resources. Dropping the
/// driver releases them. All async methods return `Send` futures so a
/// processing round can run on a background task.
pub trait NetworkDriver: Send + Sized + 'static {
    /// Construct the driver, allocating socket/event resources.
    fn create(settings: &DriverSettings) -> Result<Self, TransportError>;

    /// Derive a configured pipeline from this driver.
    fn create_pipeline(&mut self, stages: &[PipelineStage])
    -> Result<PipelineHandle, TransportError>;

    /// Begin listening for incoming connections (host role).
    fn listen(
        &mut self,
        target: &ConnectionData,
    ) -> impl Future<Output = Result<(), TransportError>> + Send;

    /// Dial a remote endpoint (client role), returning the driver's
    /// raw connection id.
    fn connect(
        &mut self,
        target: &ConnectionData,
    ) -> impl Future<Output = Result<u64, TransportError>> + Send;

    /// Send a payload on a connection through the given pipeline.
    fn send(
        &mut self,
        connection_id: u64,
        pipeline: PipelineHandle,
        payload: &[u8],
    ) -> impl Future<Output = Result<(), TransportError>> + Send;

    /// Run one round of background packet processing, emitting
    /// connection events through `events` in the order observed.
    fn process(
        &mut self,
        events: EventProducer,
    ) -> impl Future<Output = Result<(), TransportError>> + Send;
}
