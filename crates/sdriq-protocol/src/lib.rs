//! sdriq-protocol: Control-item protocol driver for the RFSPACE SDR-IQ.
//!
//! The SDR-IQ speaks a compact binary protocol over a half-duplex serial
//! link: every exchange is a framed control-item request from the host
//! answered by exactly one solicited reply from the device. This crate
//! implements the frame codec, the bounded-wait transaction engine, the
//! device-identity resolver, and the capture-session state machine, and
//! wraps them in the [`SdriqReceiver`] handle.
//!
//! # Architecture
//!
//! - [`frame`]: frame encoder/decoder and message-type constants
//! - [`items`]: the control-item catalog
//! - [`commands`]: per-item parameter builders and reply parsers
//! - [`engine`]: [`ControlEngine`], one request in flight at a time
//! - [`info`]: device identity resolution
//! - [`capture`]: run/stop state machine
//! - [`receiver`]: the high-level [`SdriqReceiver`] handle
//! - [`builder`]: fluent construction, with transport injection for tests
//!
//! # Example
//!
//! ```no_run
//! use sdriq_protocol::builder::SdriqBuilder;
//!
//! # async fn example() -> sdriq_core::Result<()> {
//! let mut rx = SdriqBuilder::new()
//!     .serial_port("/dev/ttyUSB0")
//!     .build()
//!     .await?;
//!
//! let info = rx.device_info().await?;
//! println!("{} s/n {}", info.model, info.serial);
//!
//! rx.set_frequency(14_010_000).await?;
//! rx.start_capture(0).await?;
//! // ... consume sample blocks ...
//! rx.stop_capture().await?;
//! rx.close().await?;
//! # Ok(())
//! # }
//! ```

pub mod builder;
pub mod capture;
pub mod commands;
pub mod engine;
pub mod frame;
pub mod info;
pub mod items;
pub mod receiver;

pub use builder::SdriqBuilder;
pub use capture::CaptureController;
pub use engine::ControlEngine;
pub use frame::Message;
pub use receiver::SdriqReceiver;
