//! Session layer: relay-vs-direct routing and start-up sequencing.
//!
//! [`SessionOrchestrator`] is the single place session-start policy
//! lives: it decides whether the endpoint routes through the relay
//! and, when it does, awaits the allocation workflow before bringing
//! the transport up.

mod config;
mod error;
mod orchestrator;

pub use config::*;
pub use error::*;
pub use orchestrator::*;
