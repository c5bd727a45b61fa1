//! The [`MockLink`] mock transport.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::time::Duration;

use sdriq_core::error::{Error, Result};
use sdriq_core::transport::Transport;

/// A pre-loaded request/reply exchange.
#[derive(Debug, Clone)]
struct Exchange {
    /// The exact bytes we expect the engine to send.
    request: Vec<u8>,
    /// Chunks to hand back, one per `receive()` call. An empty list
    /// simulates a device that never answers (timeout path).
    replies: Vec<Vec<u8>>,
}

/// A mock [`Transport`] for testing the protocol engine without hardware.
///
/// Exchanges are consumed in order. When `send()` is called, the sent bytes
/// are recorded and matched against the next exchange; its reply chunks are
/// then returned by subsequent `receive()` calls, one chunk per call. Once
/// the chunks are exhausted, `receive()` reports [`Error::Timeout`], which
/// is exactly what a silent half-duplex link looks like to the engine.
///
/// Splitting a reply across chunks exercises the engine's partial-read
/// reassembly; prepending unsolicited frames as extra chunks exercises its
/// skip logic.
#[derive(Debug, Default)]
pub struct MockLink {
    /// Ordered queue of expected exchanges.
    exchanges: VecDeque<Exchange>,
    /// Reply chunks pending for `receive()`.
    pending: VecDeque<Vec<u8>>,
    /// Whether the link is "connected".
    connected: bool,
    /// Log of all bytes sent through this link, one entry per `send()`.
    sent_log: Vec<Vec<u8>>,
}

impl MockLink {
    /// Create a new mock link in the connected state.
    pub fn new() -> Self {
        MockLink {
            exchanges: VecDeque::new(),
            pending: VecDeque::new(),
            connected: true,
            sent_log: Vec::new(),
        }
    }

    /// Expect `request` and answer it with `reply` in a single read.
    pub fn expect(&mut self, request: &[u8], reply: &[u8]) {
        self.exchanges.push_back(Exchange {
            request: request.to_vec(),
            replies: vec![reply.to_vec()],
        });
    }

    /// Expect `request` and answer it with several chunks, each delivered
    /// by one `receive()` call.
    ///
    /// Use this to split a frame across reads, or to interleave unsolicited
    /// frames ahead of the solicited reply.
    pub fn expect_chunked(&mut self, request: &[u8], chunks: &[&[u8]]) {
        self.exchanges.push_back(Exchange {
            request: request.to_vec(),
            replies: chunks.iter().map(|c| c.to_vec()).collect(),
        });
    }

    /// Expect `request` and never answer it.
    ///
    /// Every subsequent `receive()` reports a timeout, exercising the
    /// engine's bounded-wait error path.
    pub fn expect_silence(&mut self, request: &[u8]) {
        self.exchanges.push_back(Exchange {
            request: request.to_vec(),
            replies: Vec::new(),
        });
    }

    /// All data sent through this link, one entry per `send()` call.
    pub fn sent_data(&self) -> &[Vec<u8>] {
        &self.sent_log
    }

    /// Number of exchanges that have not yet been consumed by `send()`.
    pub fn remaining_exchanges(&self) -> usize {
        self.exchanges.len()
    }

    /// Force the connected state, for exercising `NotConnected` paths.
    pub fn set_connected(&mut self, connected: bool) {
        self.connected = connected;
    }
}

#[async_trait]
impl Transport for MockLink {
    async fn send(&mut self, data: &[u8]) -> Result<()> {
        if !self.connected {
            return Err(Error::NotConnected);
        }

        self.sent_log.push(data.to_vec());

        let exchange = self.exchanges.pop_front().ok_or_else(|| {
            Error::Protocol(format!(
                "mock link: unexpected send of {data:02X?}, no exchanges left"
            ))
        })?;

        if data != exchange.request.as_slice() {
            return Err(Error::Protocol(format!(
                "mock link: expected send of {:02X?}, got {:02X?}",
                exchange.request, data
            )));
        }

        self.pending = exchange.replies.into();
        Ok(())
    }

    async fn receive(&mut self, buf: &mut [u8], _timeout: Duration) -> Result<usize> {
        if !self.connected {
            return Err(Error::NotConnected);
        }

        let Some(mut chunk) = self.pending.pop_front() else {
            return Err(Error::Timeout);
        };

        // Respect the caller's buffer size; push the remainder back so the
        // next receive() picks it up, as a real serial read would.
        let n = chunk.len().min(buf.len());
        buf[..n].copy_from_slice(&chunk[..n]);
        if n < chunk.len() {
            let rest = chunk.split_off(n);
            self.pending.push_front(rest);
        }
        Ok(n)
    }

    async fn close(&mut self) -> Result<()> {
        self.connected = false;
        self.pending.clear();
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.connected
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NAME_REQ: &[u8] = &[0x04, 0x20, 0x01, 0x00];
    const NAME_REPLY: &[u8] = &[0x0B, 0x00, 0x01, 0x00, b'S', b'D', b'R', b'-', b'I', b'Q', 0x00];

    #[tokio::test]
    async fn basic_send_receive() {
        let mut link = MockLink::new();
        link.expect(NAME_REQ, NAME_REPLY);

        link.send(NAME_REQ).await.unwrap();

        let mut buf = [0u8; 64];
        let n = link.receive(&mut buf, Duration::from_millis(100)).await.unwrap();
        assert_eq!(&buf[..n], NAME_REPLY);
    }

    #[tokio::test]
    async fn chunked_reply_spans_reads() {
        let mut link = MockLink::new();
        link.expect_chunked(NAME_REQ, &[&NAME_REPLY[..4], &NAME_REPLY[4..]]);

        link.send(NAME_REQ).await.unwrap();

        let mut buf = [0u8; 64];
        let n = link.receive(&mut buf, Duration::from_millis(100)).await.unwrap();
        assert_eq!(&buf[..n], &NAME_REPLY[..4]);
        let n = link.receive(&mut buf, Duration::from_millis(100)).await.unwrap();
        assert_eq!(&buf[..n], &NAME_REPLY[4..]);
    }

    #[tokio::test]
    async fn small_buffer_preserves_remainder() {
        let mut link = MockLink::new();
        link.expect(NAME_REQ, NAME_REPLY);
        link.send(NAME_REQ).await.unwrap();

        let mut buf = [0u8; 4];
        let n = link.receive(&mut buf, Duration::from_millis(100)).await.unwrap();
        assert_eq!(&buf[..n], &NAME_REPLY[..4]);

        let mut rest = Vec::new();
        loop {
            match link.receive(&mut buf, Duration::from_millis(100)).await {
                Ok(n) => rest.extend_from_slice(&buf[..n]),
                Err(Error::Timeout) => break,
                Err(e) => panic!("unexpected error: {e:?}"),
            }
        }
        assert_eq!(rest, &NAME_REPLY[4..]);
    }

    #[tokio::test]
    async fn silence_times_out() {
        let mut link = MockLink::new();
        link.expect_silence(NAME_REQ);
        link.send(NAME_REQ).await.unwrap();

        let mut buf = [0u8; 64];
        let result = link.receive(&mut buf, Duration::from_millis(10)).await;
        assert!(matches!(result, Err(Error::Timeout)));
    }

    #[tokio::test]
    async fn wrong_request_errors() {
        let mut link = MockLink::new();
        link.expect(NAME_REQ, NAME_REPLY);

        let result = link.send(&[0x04, 0x20, 0x02, 0x00]).await;
        assert!(matches!(result, Err(Error::Protocol(_))));
    }

    #[tokio::test]
    async fn exhausted_exchanges_error() {
        let mut link = MockLink::new();
        let result = link.send(NAME_REQ).await;
        assert!(matches!(result, Err(Error::Protocol(_))));
    }

    #[tokio::test]
    async fn sent_log_records_everything() {
        let mut link = MockLink::new();
        link.expect(NAME_REQ, NAME_REPLY);
        link.expect_silence(&[0x04, 0x20, 0x02, 0x00]);

        link.send(NAME_REQ).await.unwrap();
        link.send(&[0x04, 0x20, 0x02, 0x00]).await.unwrap();

        assert_eq!(link.sent_data().len(), 2);
        assert_eq!(link.sent_data()[0], NAME_REQ);
        assert_eq!(link.remaining_exchanges(), 0);
    }

    #[tokio::test]
    async fn close_disconnects() {
        let mut link = MockLink::new();
        assert!(link.is_connected());

        link.close().await.unwrap();
        assert!(!link.is_connected());

        assert!(matches!(link.send(NAME_REQ).await, Err(Error::NotConnected)));
        let mut buf = [0u8; 8];
        assert!(matches!(
            link.receive(&mut buf, Duration::from_millis(10)).await,
            Err(Error::NotConnected)
        ));
    }
}
