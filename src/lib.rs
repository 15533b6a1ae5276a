//! # relaykit
//!
//! Relay-brokered session establishment for multiplayer games.
//!
//! relaykit lets an application bring up a network session either
//! directly (host listens, clients dial in) or through a third-party
//! relay service that brokers connectivity with short, human-shareable
//! join codes. It provides:
//!
//! - **Allocation workflows**: obtain a server allocation and join code
//!   for hosting, or resolve a join code into a client allocation
//! - **Transport bridging**: a driver-agnostic endpoint that owns the
//!   low-level transport, configures reliable and unreliable delivery
//!   pipelines, and drains background-produced connection events onto
//!   the foreground tick in FIFO order
//! - **Session orchestration**: one place that decides relay-vs-direct
//!   routing and sequences allocation before transport start-up
//!
//! The relay service SDK and the packet-level transport driver are
//! consumed as capabilities ([`RelayService`](relay::RelayService) and
//! [`NetworkDriver`](transport::NetworkDriver)); relaykit implements
//! neither the relay wire protocol nor packet pipeline internals.
//!
//! ## Modules
//!
//! - [`core`]: Shared constants and the top-level error type
//! - [`transport`]: Transport endpoint, driver seam, event bridge
//! - [`relay`]: Allocation models, relay service seam, allocation manager
//! - [`session`]: Session orchestrator and configuration
//!
//! ## Example Usage
//!
//! ```ignore
//! use relaykit::prelude::*;
//!
//! let mut session: SessionOrchestrator<MyRelaySdk, MyDriver> =
//!     SessionOrchestrator::new(relay_sdk, SessionConfig::default());
//!
//! // Host through the relay: allocate, fetch a join code, listen.
//! let code = session.start_relay_host(4, Some("us-east")).await?;
//! println!("share this code: {code}");
//!
//! // Per tick: complete background work, drain events, reschedule.
//! session.endpoint_mut().complete_processing().await?;
//! for event in session.endpoint_mut().drain_events() {
//!     // react to connects / disconnects / payloads
//! }
//! session.endpoint_mut().schedule_processing()?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod core;
pub mod relay;
pub mod session;
pub mod transport;

#[cfg(test)]
pub(crate) mod test_support;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::core::*;

    pub use crate::transport::{
        ConnectionData, ConnectionEvent, ConnectionHandle, DriverSettings, EndpointMode,
        EventProducer, NetworkDriver, PipelineHandle, PipelineStage, RelaySessionData,
        TransportEndpoint, TransportError,
    };

    pub use crate::relay::{
        AllocationManager, JoinAllocation, JoinCode, Region, RelayError, RelayService,
        RelayServiceError, ServerAllocation,
    };

    pub use crate::session::{SessionConfig, SessionError, SessionOrchestrator};
}

// Re-export commonly used items at crate root
pub use crate::core::RelayKitError;
pub use relay::{AllocationManager, JoinCode, RelayError, RelayService};
pub use session::{SessionConfig, SessionError, SessionOrchestrator};
pub use transport::{ConnectionEvent, NetworkDriver, TransportEndpoint, TransportError};
