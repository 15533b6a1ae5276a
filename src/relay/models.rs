//! Resource models minted by the relay service.
//!
//! All of these are single-owner value records: reassigned wholesale
//! on each successful operation, never mutated in place.

use std::fmt;
use std::net::SocketAddr;

use serde::{Deserialize, Serialize};

use crate::transport::RelaySessionData;

/// A reserved relay slot for a hosting endpoint.
///
/// Immutable once obtained; re-allocating replaces the whole record.
/// Created and destroyed together with its [`JoinCode`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerAllocation {
    /// Service-assigned allocation identifier.
    pub allocation_id: String,
    /// The relay server hosting this allocation.
    pub relay_server: SocketAddr,
    /// Security key material for the relay handshake.
    pub key: Vec<u8>,
    /// The host's connection data blob.
    pub connection_data: Vec<u8>,
}

impl ServerAllocation {
    /// Connection data for attaching the transport to this allocation.
    pub fn session_data(&self) -> RelaySessionData {
        RelaySessionData {
            relay_server: self.relay_server,
            allocation_id: self.allocation_id.clone(),
            key: self.key.clone(),
            connection_data: self.connection_data.clone(),
            host_connection_data: None,
        }
    }
}

/// A client-side allocation obtained by resolving a join code.
///
/// Independent of any [`ServerAllocation`] held by the same process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinAllocation {
    /// Service-assigned allocation identifier.
    pub allocation_id: String,
    /// The relay server hosting the session being joined.
    pub relay_server: SocketAddr,
    /// Security key material for the relay handshake.
    pub key: Vec<u8>,
    /// This client's connection data blob.
    pub connection_data: Vec<u8>,
    /// The host's connection data blob.
    pub host_connection_data: Vec<u8>,
}

impl JoinAllocation {
    /// Connection data for dialing the relay as a client.
    pub fn session_data(&self) -> RelaySessionData {
        RelaySessionData {
            relay_server: self.relay_server,
            allocation_id: self.allocation_id.clone(),
            key: self.key.clone(),
            connection_data: self.connection_data.clone(),
            host_connection_data: Some(self.host_connection_data.clone()),
        }
    }
}

/// Short human-shareable code that lets a client resolve a host's
/// allocation.
///
/// The only allocation state meant to be surfaced to end users; valid
/// only as long as the backing [`ServerAllocation`] is.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JoinCode(String);

impl JoinCode {
    /// Wrap a code returned by the relay service.
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    /// The code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True if the code is empty (never the case for a code minted by
    /// a successful allocation).
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for JoinCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A relay point of presence.
///
/// Read-only, fetched on demand, never cached: repeated queries
/// re-fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    /// Service identifier, e.g. `us-east`.
    pub id: String,
    /// Human-readable locality description.
    pub description: String,
}
