//! Transport layer: endpoint, driver seam, and event bridging.
//!
//! This module owns the glue between a low-level packet driver and the
//! application's foreground tick. It provides:
//!
//! - **Driver seam**: [`NetworkDriver`], the capability trait for the
//!   underlying socket/packet machinery, consumed, never reimplemented
//! - **Delivery pipelines**: [`PipelineStage`] recipes for
//!   reliable-sequenced-with-fragmentation and unreliable-sequenced
//!   delivery, derived once per driver
//! - **Event bridge**: [`ConnectionEvent`]s produced by background
//!   processing, drained FIFO on the foreground via [`EventQueue`]
//! - **Endpoint**: [`TransportEndpoint`], which ties all of the above
//!   together with an explicit background-completion barrier
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │          Session Layer                  │
//! ├─────────────────────────────────────────┤
//! │        Transport Endpoint               │  ← This module
//! │  pipelines, events, completion barrier  │
//! ├─────────────────────────────────────────┤
//! │        Network Driver (capability)      │
//! └─────────────────────────────────────────┘
//! ```

mod driver;
mod endpoint;
mod error;
mod events;

pub use driver::*;
pub use endpoint::*;
pub use error::*;
pub use events::*;
