//! Transport trait for device communication.
//!
//! The [`Transport`] trait abstracts over the physical link to the receiver.
//! Implementations exist for the SDR-IQ's FTDI USB-serial device node, for
//! serial-over-TCP bridges, and for mock links used in tests.
//!
//! The protocol engine (`sdriq-protocol`) operates on a `Transport` rather
//! than directly on a device path, so the same codec and transaction logic
//! runs against real hardware and against `MockLink` from the
//! `sdriq-test-harness` crate.

use async_trait::async_trait;
use std::time::Duration;

use crate::error::Result;

/// Asynchronous byte-level transport to the receiver.
///
/// Implementations handle buffering and error mapping at the physical layer.
/// Framing and control-item semantics live in the protocol engine that
/// consumes this trait.
///
/// A transport is exclusively owned by one driver handle; the trait takes
/// `&mut self` everywhere so the borrow checker enforces that no two
/// exchanges interleave on the same link.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send raw bytes to the device.
    ///
    /// Implementations should not return until every byte has been handed
    /// to the underlying link (serial TX buffer, TCP socket).
    async fn send(&mut self, data: &[u8]) -> Result<()>;

    /// Receive bytes from the device into the provided buffer.
    ///
    /// Returns the number of bytes actually read. Waits up to `timeout` for
    /// data to arrive; returns [`Error::Timeout`](crate::error::Error::Timeout)
    /// if nothing is received within the bound.
    async fn receive(&mut self, buf: &mut [u8], timeout: Duration) -> Result<usize>;

    /// Close the transport.
    ///
    /// After `close()`, subsequent `send()` and `receive()` calls return
    /// [`Error::NotConnected`](crate::error::Error::NotConnected).
    async fn close(&mut self) -> Result<()>;

    /// Check whether the transport is currently connected.
    fn is_connected(&self) -> bool;
}
