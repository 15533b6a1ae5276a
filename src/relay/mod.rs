//! Relay layer: allocation models, the service seam, and the
//! allocation manager.
//!
//! The relay service reserves a slot (an *allocation*) on one of its
//! points of presence and mints a short *join code* that clients
//! resolve into their own client-side allocation. This module wraps
//! those asynchronous SDK calls into two workflows:
//!
//! - **Hosting**: [`AllocationManager::allocate_server`] obtains a
//!   [`ServerAllocation`] plus its [`JoinCode`] as one atomic-looking
//!   operation
//! - **Joining**: [`AllocationManager::resolve_join_code`] turns a
//!   shared code into a [`JoinAllocation`]
//!
//! The SDK itself is consumed through [`RelayService`] and never
//! reimplemented here.

mod error;
mod manager;
mod models;
mod service;

pub use error::*;
pub use manager::*;
pub use models::*;
pub use service::*;
