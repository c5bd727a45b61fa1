//! High-level receiver handle.

use tracing::{debug, info, warn};

use sdriq_core::types::{CaptureState, DeviceInfo, ReceiverStatus, RfGain};
use sdriq_core::Result;

use crate::capture::CaptureController;
use crate::commands;
use crate::engine::ControlEngine;
use crate::info::resolve_device_info;
use crate::items::{
    CI_ADC_SAMPLE_RATE, CI_RECEIVER_FREQUENCY, CI_RF_GAIN, CI_STATUS, CI_STATUS_STRING,
};

/// A connected SDR-IQ receiver.
///
/// Wraps the transaction engine with typed operations for the control items
/// the device exposes, and tracks the capture session so run/stop ordering
/// mistakes are caught host-side. All methods take `&mut self`; the link is
/// half duplex and only one exchange can be outstanding.
pub struct SdriqReceiver {
    engine: ControlEngine,
    capture: CaptureController,
    info: Option<DeviceInfo>,
}

impl SdriqReceiver {
    /// Wrap an engine in a receiver handle.
    pub fn new(engine: ControlEngine) -> Self {
        SdriqReceiver {
            engine,
            capture: CaptureController::new(),
            info: None,
        }
    }

    /// Device identity, resolved on first call and cached for the session.
    pub async fn device_info(&mut self) -> Result<DeviceInfo> {
        if let Some(info) = &self.info {
            return Ok(info.clone());
        }
        let info = resolve_device_info(&mut self.engine).await?;
        self.info = Some(info.clone());
        Ok(info)
    }

    /// Current receiver status code.
    pub async fn status(&mut self) -> Result<ReceiverStatus> {
        let reply = self.engine.request_item(CI_STATUS).await?;
        let status = commands::parse_status(&reply.data)?;
        debug!(%status, "receiver status");
        Ok(status)
    }

    /// Human-readable status/error string from the device.
    pub async fn status_string(&mut self) -> Result<String> {
        let reply = self.engine.request_item(CI_STATUS_STRING).await?;
        Ok(commands::parse_string(&reply.data))
    }

    /// Tune the receiver center frequency, in hertz.
    pub async fn set_frequency(&mut self, hz: u32) -> Result<()> {
        self.engine
            .set_item(CI_RECEIVER_FREQUENCY, &commands::tuned_value_params(hz))
            .await?;
        info!(hz, "frequency set");
        Ok(())
    }

    /// Read back the current center frequency, in hertz.
    pub async fn frequency(&mut self) -> Result<u32> {
        let reply = self
            .engine
            .request_item_with(CI_RECEIVER_FREQUENCY, &commands::tuned_value_request_params())
            .await?;
        commands::parse_tuned_value(&reply.data)
    }

    /// Set the ADC sample rate, in hertz.
    pub async fn set_sample_rate(&mut self, hz: u32) -> Result<()> {
        self.engine
            .set_item(CI_ADC_SAMPLE_RATE, &commands::tuned_value_params(hz))
            .await?;
        info!(hz, "sample rate set");
        Ok(())
    }

    /// Read back the current ADC sample rate, in hertz.
    pub async fn sample_rate(&mut self) -> Result<u32> {
        let reply = self
            .engine
            .request_item_with(CI_ADC_SAMPLE_RATE, &commands::tuned_value_request_params())
            .await?;
        commands::parse_tuned_value(&reply.data)
    }

    /// Set the RF gain. The value is validated before anything is sent.
    pub async fn set_rf_gain(&mut self, gain: RfGain) -> Result<()> {
        let params = commands::rf_gain_params(gain)?;
        self.engine.set_item(CI_RF_GAIN, &params).await?;
        info!(?gain, "RF gain set");
        Ok(())
    }

    /// Read back the current RF gain setting.
    pub async fn rf_gain(&mut self) -> Result<RfGain> {
        let reply = self.engine.request_item(CI_RF_GAIN).await?;
        commands::parse_rf_gain(&reply.data)
    }

    /// Start capturing. Zero blocks means contiguous streaming.
    pub async fn start_capture(&mut self, block_count: u16) -> Result<()> {
        self.capture.start(&mut self.engine, block_count).await
    }

    /// Stop a running capture.
    pub async fn stop_capture(&mut self) -> Result<()> {
        self.capture.stop(&mut self.engine).await
    }

    /// Current capture-session state, as tracked host-side.
    pub fn capture_state(&self) -> CaptureState {
        self.capture.state()
    }

    /// Whether the underlying transport considers itself connected.
    pub fn is_connected(&self) -> bool {
        self.engine.is_connected()
    }

    /// Shut down the session.
    ///
    /// Stops a running capture first so the device is not left streaming
    /// into a dead link. A failed stop is logged and the close proceeds.
    pub async fn close(&mut self) -> Result<()> {
        if let CaptureState::Running(_) = self.capture.state() {
            if let Err(e) = self.capture.stop(&mut self.engine).await {
                warn!(error = %e, "could not stop capture during close");
            }
        }
        self.engine.close().await
    }
}

impl std::fmt::Debug for SdriqReceiver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SdriqReceiver")
            .field("engine", &self.engine)
            .field("capture", &self.capture)
            .field("info", &self.info)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sdriq_core::types::CaptureMode;
    use sdriq_core::Error;
    use sdriq_test_harness::MockLink;

    fn receiver(link: MockLink) -> SdriqReceiver {
        SdriqReceiver::new(ControlEngine::new(Box::new(link)))
    }

    fn expect_identity(link: &mut MockLink) {
        link.expect(
            &[0x04, 0x20, 0x01, 0x00],
            &[0x0B, 0x00, 0x01, 0x00, b'S', b'D', b'R', b'-', b'I', b'Q', 0x00],
        );
        link.expect(
            &[0x04, 0x20, 0x02, 0x00],
            &[0x0A, 0x00, 0x02, 0x00, b'E', b'N', b'0', b'0', b'7', 0x00],
        );
        link.expect(
            &[0x04, 0x20, 0x03, 0x00],
            &[0x06, 0x00, 0x03, 0x00, 0x64, 0x00],
        );
        link.expect(
            &[0x05, 0x20, 0x04, 0x00, 0x00],
            &[0x07, 0x00, 0x04, 0x00, 0x00, 0x37, 0x00],
        );
        link.expect(
            &[0x05, 0x20, 0x04, 0x00, 0x01],
            &[0x07, 0x00, 0x04, 0x00, 0x01, 0x0F, 0x01],
        );
    }

    #[tokio::test]
    async fn device_info_is_cached() {
        let mut link = MockLink::new();
        // Identity expectations loaded once; a second resolve would fail.
        expect_identity(&mut link);

        let mut rx = receiver(link);
        let first = rx.device_info().await.unwrap();
        assert_eq!(first.model, "SDR-IQ");

        let second = rx.device_info().await.unwrap();
        assert_eq!(second, first);
    }

    #[tokio::test]
    async fn status_decodes_code() {
        let mut link = MockLink::new();
        link.expect(&[0x04, 0x20, 0x05, 0x00], &[0x05, 0x00, 0x05, 0x00, 0x0B]);

        let mut rx = receiver(link);
        assert_eq!(rx.status().await.unwrap(), ReceiverStatus::Idle);
    }

    #[tokio::test]
    async fn status_string_reads_item_0006() {
        let mut link = MockLink::new();
        link.expect(
            &[0x04, 0x20, 0x06, 0x00],
            &[0x07, 0x00, 0x06, 0x00, b'O', b'K', 0x00],
        );

        let mut rx = receiver(link);
        assert_eq!(rx.status_string().await.unwrap(), "OK");
    }

    #[tokio::test]
    async fn frequency_round_trip() {
        let mut link = MockLink::new();
        let set = [0x09, 0x00, 0x20, 0x00, 0x00, 0x90, 0xC6, 0xD5, 0x00];
        link.expect(&set, &set);
        link.expect(
            &[0x05, 0x20, 0x20, 0x00, 0x00],
            &[0x09, 0x00, 0x20, 0x00, 0x00, 0x90, 0xC6, 0xD5, 0x00],
        );

        let mut rx = receiver(link);
        rx.set_frequency(14_010_000).await.unwrap();
        assert_eq!(rx.frequency().await.unwrap(), 14_010_000);
    }

    #[tokio::test]
    async fn sample_rate_round_trip() {
        let mut link = MockLink::new();
        // 196078 Hz = 0x0002FDEE.
        let set = [0x09, 0x00, 0xB0, 0x00, 0x00, 0xEE, 0xFD, 0x02, 0x00];
        link.expect(&set, &set);
        link.expect(
            &[0x05, 0x20, 0xB0, 0x00, 0x00],
            &[0x09, 0x00, 0xB0, 0x00, 0x00, 0xEE, 0xFD, 0x02, 0x00],
        );

        let mut rx = receiver(link);
        rx.set_sample_rate(196_078).await.unwrap();
        assert_eq!(rx.sample_rate().await.unwrap(), 196_078);
    }

    #[tokio::test]
    async fn rf_gain_set_and_read() {
        let mut link = MockLink::new();
        let set = [0x06, 0x00, 0x38, 0x00, 0x00, 0xF6];
        link.expect(&set, &set);
        link.expect(
            &[0x04, 0x20, 0x38, 0x00],
            &[0x06, 0x00, 0x38, 0x00, 0x01, 0xB3],
        );

        let mut rx = receiver(link);
        rx.set_rf_gain(RfGain::Fixed(-10)).await.unwrap();
        assert_eq!(
            rx.rf_gain().await.unwrap(),
            RfGain::Manual {
                gain: 0x33,
                attenuator: true
            }
        );
    }

    #[tokio::test]
    async fn invalid_rf_gain_rejected_without_io() {
        let link = MockLink::new();
        let mut rx = receiver(link);
        let result = rx.set_rf_gain(RfGain::Fixed(-15)).await;
        assert!(matches!(result, Err(Error::InvalidParameter(_))));
    }

    #[tokio::test]
    async fn capture_session_through_facade() {
        let start = [0x08, 0x00, 0x18, 0x00, 0x81, 0x02, 0x00, 0x00];
        let stop = [0x08, 0x00, 0x18, 0x00, 0x81, 0x01, 0x00, 0x00];
        let mut link = MockLink::new();
        link.expect(&start, &start);
        link.expect(&stop, &stop);

        let mut rx = receiver(link);
        rx.start_capture(0).await.unwrap();
        assert_eq!(
            rx.capture_state(),
            CaptureState::Running(CaptureMode::Contiguous)
        );
        rx.stop_capture().await.unwrap();
        assert_eq!(rx.capture_state(), CaptureState::Idle);
    }

    #[tokio::test]
    async fn close_stops_running_capture() {
        let start = [0x08, 0x00, 0x18, 0x00, 0x81, 0x02, 0x00, 0x00];
        let stop = [0x08, 0x00, 0x18, 0x00, 0x81, 0x01, 0x00, 0x00];
        let mut link = MockLink::new();
        link.expect(&start, &start);
        link.expect(&stop, &stop);

        let mut rx = receiver(link);
        rx.start_capture(0).await.unwrap();
        rx.close().await.unwrap();
        assert!(!rx.is_connected());
        assert_eq!(rx.capture_state(), CaptureState::Idle);
    }

    #[tokio::test]
    async fn close_proceeds_when_stop_fails() {
        let start = [0x08, 0x00, 0x18, 0x00, 0x81, 0x02, 0x00, 0x00];
        let stop = [0x08, 0x00, 0x18, 0x00, 0x81, 0x01, 0x00, 0x00];
        let mut link = MockLink::new();
        link.expect(&start, &start);
        link.expect_silence(&stop);

        let mut rx = receiver(link);
        rx.start_capture(0).await.unwrap();
        rx.close().await.unwrap();
        assert!(!rx.is_connected());
    }
}
