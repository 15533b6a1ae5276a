//! Fixed constants shared across the crate.

use std::time::Duration;

// =============================================================================
// TRANSPORT
// =============================================================================

/// Maximum payload size applied to the driver's fragmentation stage.
///
/// Payloads up to this size are fragmented and reassembled by the
/// reliable pipeline; the unreliable pipeline never fragments.
pub const PAYLOAD_CAPACITY: usize = 10_000;

/// Default timeout applied by the driver to unresponsive connections.
pub const DEFAULT_CONNECTION_TIMEOUT: Duration = Duration::from_millis(1000);

// =============================================================================
// SESSION
// =============================================================================

/// Default port a standard (non-relayed) server listens on.
pub const DEFAULT_LISTEN_PORT: u16 = 7777;
