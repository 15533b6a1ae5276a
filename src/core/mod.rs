//! Core constants and the top-level error type.
//!
//! Everything in this module is shared by the transport, relay, and
//! session layers.

pub mod constants;
mod error;

pub use constants::*;
pub use error::*;
