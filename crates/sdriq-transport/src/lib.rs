//! Transport implementations for the SDR-IQ driver.
//!
//! Concrete implementations of the [`Transport`](sdriq_core::Transport)
//! trait from `sdriq-core`:
//!
//! - [`SerialTransport`]: the SDR-IQ's FTDI USB-serial device node
//! - [`TcpTransport`]: a serial-over-TCP bridge (ser2net or similar) for
//!   receivers attached to a remote host
//!
//! # Example
//!
//! ```no_run
//! use sdriq_transport::SerialTransport;
//! use sdriq_core::transport::Transport;
//! use std::time::Duration;
//!
//! # async fn example() -> sdriq_core::Result<()> {
//! let mut transport = SerialTransport::open("/dev/ttyUSB0").await?;
//!
//! // Request the device name control item
//! transport.send(&[0x04, 0x20, 0x01, 0x00]).await?;
//!
//! let mut buf = [0u8; 256];
//! let n = transport.receive(&mut buf, Duration::from_millis(500)).await?;
//! # Ok(())
//! # }
//! ```

pub mod serial;
pub mod tcp;

pub use serial::{SerialTransport, DEFAULT_BAUD_RATE};
pub use tcp::TcpTransport;
