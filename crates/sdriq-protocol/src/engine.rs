//! Bounded-wait control-item transaction engine.
//!
//! The SDR-IQ link is half duplex: the host sends one control-item frame and
//! waits for the matching reply before sending the next. [`ControlEngine`]
//! owns the transport and drives that exchange. `&mut self` on
//! [`ControlEngine::transact`] is what enforces the one-in-flight rule; there
//! is no pipelining and no automatic retry.

use std::time::Duration;

use tokio::time::Instant;
use tracing::{debug, trace};

use sdriq_core::transport::Transport;
use sdriq_core::{Error, Result};

use crate::frame::{
    self, Message, HEADER_LEN, HOST_REQ_CTRL_ITEM, HOST_SET_CTRL_ITEM, NAK_LEN,
    TARGET_DATA_ITEM_0,
};
use crate::items;

/// Default bound on how long one transaction may wait for its reply.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(500);

/// Default capacity of the scratch buffer handed to `Transport::receive`.
pub const DEFAULT_RECV_CAPACITY: usize = 512;

/// Drives request/reply exchanges over an owned transport.
///
/// Inbound bytes accumulate in an internal buffer until a complete frame is
/// available. Unsolicited broadcasts and sample data blocks that arrive while
/// waiting for a solicited reply are discarded.
pub struct ControlEngine {
    transport: Box<dyn Transport>,
    timeout: Duration,
    /// Accumulated inbound bytes, possibly holding a partial frame.
    rx_buf: Vec<u8>,
    /// Scratch buffer for transport reads.
    recv_buf: Vec<u8>,
}

impl ControlEngine {
    /// Create an engine with the default timeout and receive capacity.
    pub fn new(transport: Box<dyn Transport>) -> Self {
        Self::with_config(transport, DEFAULT_TIMEOUT, DEFAULT_RECV_CAPACITY)
    }

    /// Create an engine with an explicit timeout and receive capacity.
    pub fn with_config(
        transport: Box<dyn Transport>,
        timeout: Duration,
        recv_capacity: usize,
    ) -> Self {
        ControlEngine {
            transport,
            timeout,
            rx_buf: Vec::new(),
            recv_buf: vec![0u8; recv_capacity.max(HEADER_LEN)],
        }
    }

    /// The per-transaction reply timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Change the per-transaction reply timeout.
    pub fn set_timeout(&mut self, timeout: Duration) {
        self.timeout = timeout;
    }

    /// Whether the underlying transport considers itself connected.
    pub fn is_connected(&self) -> bool {
        self.transport.is_connected()
    }

    /// Close the underlying transport.
    pub async fn close(&mut self) -> Result<()> {
        self.transport.close().await
    }

    /// Request the current value of a control item.
    pub async fn request_item(&mut self, item: u16) -> Result<Message> {
        self.transact(HOST_REQ_CTRL_ITEM, item, &[]).await
    }

    /// Request a control item with selector parameters.
    pub async fn request_item_with(&mut self, item: u16, params: &[u8]) -> Result<Message> {
        self.transact(HOST_REQ_CTRL_ITEM, item, params).await
    }

    /// Set a control item. The device acknowledges by echoing the item.
    pub async fn set_item(&mut self, item: u16, params: &[u8]) -> Result<Message> {
        self.transact(HOST_SET_CTRL_ITEM, item, params).await
    }

    /// Perform one request/reply exchange with the engine's timeout.
    pub async fn transact(&mut self, msg_type: u8, item: u16, params: &[u8]) -> Result<Message> {
        self.transact_with_timeout(msg_type, item, params, self.timeout)
            .await
    }

    /// Perform one request/reply exchange with an explicit timeout.
    ///
    /// Stale bytes left over from an earlier aborted exchange are discarded
    /// before the request goes out, so a late reply to a timed-out request
    /// cannot be mistaken for the answer to this one.
    pub async fn transact_with_timeout(
        &mut self,
        msg_type: u8,
        item: u16,
        params: &[u8],
        timeout: Duration,
    ) -> Result<Message> {
        if !self.rx_buf.is_empty() {
            debug!(
                stale = self.rx_buf.len(),
                "discarding stale inbound bytes"
            );
            self.rx_buf.clear();
        }

        let request = frame::encode(msg_type, item, params)?;
        trace!(
            item = format_args!("0x{item:04X}"),
            name = items::item_name(item),
            tx = format_args!("{request:02X?}"),
            "sending control frame"
        );
        self.transport.send(&request).await?;

        let deadline = Instant::now() + timeout;
        loop {
            if let Some(msg) = self.extract_reply(item)? {
                return Ok(msg);
            }

            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return Err(Error::Timeout);
            }
            let n = self.transport.receive(&mut self.recv_buf, remaining).await?;
            self.rx_buf.extend_from_slice(&self.recv_buf[..n]);
        }
    }

    /// Consume complete frames from the inbound buffer until a solicited
    /// reply to `item` is found or the buffer runs dry.
    fn extract_reply(&mut self, item: u16) -> Result<Option<Message>> {
        while let Some((msg_type, frame_len)) = frame::peek_header(&self.rx_buf) {
            // A bare 2-byte header is the device refusing the item.
            if frame_len == NAK_LEN {
                self.rx_buf.drain(..NAK_LEN);
                debug!(item = format_args!("0x{item:04X}"), "device NAK");
                return Err(Error::Nak { item });
            }
            if frame_len < HEADER_LEN {
                return Err(Error::Protocol(format!(
                    "invalid declared frame length {frame_len}"
                )));
            }
            if self.rx_buf.len() < frame_len {
                return Ok(None);
            }

            if msg_type >= TARGET_DATA_ITEM_0 {
                trace!(len = frame_len, "discarding data block");
                self.rx_buf.drain(..frame_len);
                continue;
            }

            let msg = frame::decode(&self.rx_buf[..frame_len])?;
            self.rx_buf.drain(..frame_len);

            if msg.is_unsolicited() {
                debug!(
                    item = format_args!("0x{:04X}", msg.item),
                    "skipping unsolicited frame"
                );
                continue;
            }
            if msg.is_response() && msg.item == item {
                trace!(
                    item = format_args!("0x{:04X}", msg.item),
                    len = msg.data.len(),
                    "reply received"
                );
                return Ok(Some(msg));
            }
            // A solicited-looking frame for some other item is a late reply
            // to an earlier timed-out request.
            debug!(
                item = format_args!("0x{:04X}", msg.item),
                "skipping reply for a different item"
            );
        }
        Ok(None)
    }
}

impl std::fmt::Debug for ControlEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ControlEngine")
            .field("timeout", &self.timeout)
            .field("buffered", &self.rx_buf.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::items::CI_TARGET_NAME;
    use sdriq_test_harness::MockLink;

    const NAME_REQ: &[u8] = &[0x04, 0x20, 0x01, 0x00];
    const NAME_REPLY: &[u8] = &[
        0x0B, 0x00, 0x01, 0x00, b'S', b'D', b'R', b'-', b'I', b'Q', 0x00,
    ];

    fn engine(link: MockLink) -> ControlEngine {
        ControlEngine::new(Box::new(link))
    }

    #[tokio::test]
    async fn request_and_reply() {
        let mut link = MockLink::new();
        link.expect(NAME_REQ, NAME_REPLY);

        let mut engine = engine(link);
        let msg = engine.request_item(CI_TARGET_NAME).await.unwrap();
        assert_eq!(msg.item, CI_TARGET_NAME);
        assert_eq!(msg.data, b"SDR-IQ\0");
    }

    #[tokio::test]
    async fn set_is_echoed() {
        let mut link = MockLink::new();
        // Start-capture set, echoed back by the device.
        link.expect(
            &[0x08, 0x00, 0x18, 0x00, 0x81, 0x02, 0x00, 0x00],
            &[0x08, 0x00, 0x18, 0x00, 0x81, 0x02, 0x00, 0x00],
        );

        let mut engine = engine(link);
        let msg = engine.set_item(0x0018, &[0x81, 0x02, 0x00, 0x00]).await.unwrap();
        assert_eq!(msg.item, 0x0018);
        assert_eq!(msg.data, [0x81, 0x02, 0x00, 0x00]);
    }

    #[tokio::test]
    async fn silence_times_out() {
        let mut link = MockLink::new();
        link.expect_silence(NAME_REQ);

        let mut engine = engine(link);
        let result = engine.request_item(CI_TARGET_NAME).await;
        assert!(matches!(result, Err(Error::Timeout)));
    }

    #[tokio::test]
    async fn nak_reply_reports_item() {
        let mut link = MockLink::new();
        // Unsupported item: the device answers with a bare 2-byte header.
        link.expect(&[0x04, 0x20, 0x99, 0x00], &[0x02, 0x00]);

        let mut engine = engine(link);
        let result = engine.request_item(0x0099).await;
        assert!(matches!(result, Err(Error::Nak { item: 0x0099 })));
    }

    #[tokio::test]
    async fn unsolicited_frame_is_skipped() {
        let mut link = MockLink::new();
        // An unsolicited ADC-overload status broadcast lands first.
        let overload = [0x05, 0x20, 0x05, 0x00, 0x20];
        link.expect_chunked(NAME_REQ, &[&overload, NAME_REPLY]);

        let mut engine = engine(link);
        let msg = engine.request_item(CI_TARGET_NAME).await.unwrap();
        assert_eq!(msg.data, b"SDR-IQ\0");
    }

    #[tokio::test]
    async fn data_block_is_discarded() {
        let mut link = MockLink::new();
        // A full 8194-byte sample block arrives ahead of the reply.
        let mut block = vec![0u8; frame::DATA_BLOCK_LEN];
        block[0] = 0x00;
        block[1] = 0x80;
        link.expect_chunked(NAME_REQ, &[&block, NAME_REPLY]);

        let mut engine = engine(link);
        let msg = engine.request_item(CI_TARGET_NAME).await.unwrap();
        assert_eq!(msg.data, b"SDR-IQ\0");
    }

    #[tokio::test]
    async fn reply_split_across_reads() {
        let mut link = MockLink::new();
        link.expect_chunked(
            NAME_REQ,
            &[&NAME_REPLY[..3], &NAME_REPLY[3..7], &NAME_REPLY[7..]],
        );

        let mut engine = engine(link);
        let msg = engine.request_item(CI_TARGET_NAME).await.unwrap();
        assert_eq!(msg.data, b"SDR-IQ\0");
    }

    #[tokio::test]
    async fn reply_for_other_item_is_skipped() {
        let mut link = MockLink::new();
        // A late reply to an earlier serial-number request shows up first.
        let stray = [0x08, 0x00, 0x02, 0x00, b'1', b'2', b'3', 0x00];
        link.expect_chunked(NAME_REQ, &[&stray, NAME_REPLY]);

        let mut engine = engine(link);
        let msg = engine.request_item(CI_TARGET_NAME).await.unwrap();
        assert_eq!(msg.item, CI_TARGET_NAME);
    }

    #[tokio::test]
    async fn stale_bytes_flushed_between_transactions() {
        let mut link = MockLink::new();
        // The first exchange delivers its reply plus trailing garbage that a
        // naive engine would misread as the next transaction's answer.
        let mut first = NAME_REPLY.to_vec();
        first.extend_from_slice(&[0x08, 0x00, 0x02, 0x00, b'o', b'l', b'd', 0x00]);
        link.expect(NAME_REQ, &first);
        let serial_req = [0x04, 0x20, 0x02, 0x00];
        let serial_reply = [0x08, 0x00, 0x02, 0x00, b'n', b'e', b'w', 0x00];
        link.expect(&serial_req, &serial_reply);

        let mut engine = engine(link);
        engine.request_item(CI_TARGET_NAME).await.unwrap();
        let msg = engine.request_item(0x0002).await.unwrap();
        assert_eq!(msg.data, b"new\0");
    }

    #[tokio::test]
    async fn oversized_params_fail_before_send() {
        // No expectations loaded: any send would error with Protocol, so a
        // LengthOverflow here proves nothing was written.
        let link = MockLink::new();
        let mut engine = engine(link);
        let params = vec![0u8; frame::MAX_FRAME_LEN];
        let result = engine.set_item(0x0020, &params).await;
        assert!(matches!(result, Err(Error::LengthOverflow { .. })));
    }

    #[tokio::test]
    async fn invalid_declared_length_is_protocol_error() {
        let mut link = MockLink::new();
        // Declared length 3 is neither a NAK nor a full header.
        link.expect(NAME_REQ, &[0x03, 0x00, 0x01]);

        let mut engine = engine(link);
        let result = engine.request_item(CI_TARGET_NAME).await;
        assert!(matches!(result, Err(Error::Protocol(_))));
    }

    #[tokio::test]
    async fn per_call_timeout_overrides_default() {
        let mut link = MockLink::new();
        link.expect_silence(NAME_REQ);

        let mut engine = engine(link);
        let result = engine
            .transact_with_timeout(HOST_REQ_CTRL_ITEM, CI_TARGET_NAME, &[], Duration::from_millis(5))
            .await;
        assert!(matches!(result, Err(Error::Timeout)));
    }
}
