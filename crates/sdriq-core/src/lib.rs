//! sdriq-core: Core traits, types, and error definitions for the SDR-IQ driver.
//!
//! This crate defines the transport-agnostic abstractions the protocol
//! engine is built on. Applications that only need the shared types (device
//! info, capture state, error values) can depend on this crate without
//! pulling in a concrete serial or TCP transport.
//!
//! # Key types
//!
//! - [`Transport`] -- byte-level communication channel to the receiver
//! - [`DeviceInfo`] -- identity and firmware data read from the device
//! - [`Error`] / [`Result`] -- error handling

pub mod error;
pub mod transport;
pub mod types;

// Re-export key types at crate root for ergonomic `use sdriq_core::*`.
pub use error::{Error, Result};
pub use transport::Transport;
pub use types::*;
