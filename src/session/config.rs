//! Session configuration.

use std::net::SocketAddr;

use crate::core::constants::DEFAULT_LISTEN_PORT;
use crate::transport::DriverSettings;

/// Configuration for a session orchestrator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Address a standard (non-relayed) server listens on.
    pub listen_address: SocketAddr,

    /// Settings applied when the transport driver is created.
    pub driver: DriverSettings,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            listen_address: SocketAddr::from(([0, 0, 0, 0], DEFAULT_LISTEN_PORT)),
            driver: DriverSettings::default(),
        }
    }
}
