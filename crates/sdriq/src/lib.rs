//! sdriq: Host-side driver for the RFSPACE SDR-IQ software-defined radio.
//!
//! This facade crate re-exports the driver's public surface from its
//! component crates:
//!
//! - `sdriq-core`: the [`Transport`] trait, shared types, [`Error`]/[`Result`]
//! - `sdriq-transport`: [`SerialTransport`] and [`TcpTransport`]
//! - `sdriq-protocol`: codec, transaction engine, and the
//!   [`SdriqReceiver`] handle
//!
//! # Quick start
//!
//! ```no_run
//! use sdriq::SdriqBuilder;
//!
//! # async fn example() -> sdriq::Result<()> {
//! let mut rx = SdriqBuilder::new()
//!     .serial_port("/dev/ttyUSB0")
//!     .build()
//!     .await?;
//!
//! let info = rx.device_info().await?;
//! println!("{} s/n {} firmware {}", info.model, info.serial, info.firmware_version);
//!
//! rx.set_frequency(7_074_000).await?;
//! rx.start_capture(0).await?;
//! rx.stop_capture().await?;
//! rx.close().await?;
//! # Ok(())
//! # }
//! ```

pub use sdriq_core::{
    CaptureMode, CaptureState, DeviceInfo, Error, ReceiverStatus, Result, RfGain, Transport,
};
pub use sdriq_protocol::{
    builder::SdriqBuilder, capture::CaptureController, engine::ControlEngine, frame,
    receiver::SdriqReceiver,
};
pub use sdriq_transport::{SerialTransport, TcpTransport, DEFAULT_BAUD_RATE};

#[cfg(test)]
mod tests {
    use super::*;
    use sdriq_test_harness::MockLink;

    // A session exercised end to end through the facade surface.
    #[tokio::test]
    async fn facade_session_round_trip() {
        let mut link = MockLink::new();
        link.expect(&[0x04, 0x20, 0x05, 0x00], &[0x05, 0x00, 0x05, 0x00, 0x0B]);
        let start = [0x08, 0x00, 0x18, 0x00, 0x81, 0x02, 0x01, 0x02];
        link.expect(&start, &start);
        let stop = [0x08, 0x00, 0x18, 0x00, 0x81, 0x01, 0x00, 0x00];
        link.expect(&stop, &stop);

        let mut rx = SdriqBuilder::new().build_with_transport(Box::new(link));
        assert_eq!(rx.status().await.unwrap(), ReceiverStatus::Idle);

        rx.start_capture(2).await.unwrap();
        assert_eq!(
            rx.capture_state(),
            CaptureState::Running(CaptureMode::OneShot(2))
        );
        rx.stop_capture().await.unwrap();

        rx.close().await.unwrap();
        assert!(!rx.is_connected());
    }
}
