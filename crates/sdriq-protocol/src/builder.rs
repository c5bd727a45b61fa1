//! Fluent construction of an [`SdriqReceiver`].

use std::time::Duration;

use tracing::debug;

use sdriq_core::transport::Transport;
use sdriq_core::{Error, Result};
use sdriq_transport::{SerialTransport, TcpTransport, DEFAULT_BAUD_RATE};

use crate::engine::{ControlEngine, DEFAULT_RECV_CAPACITY, DEFAULT_TIMEOUT};
use crate::receiver::SdriqReceiver;

/// Where the receiver is reachable.
#[derive(Debug, Clone)]
enum Endpoint {
    Serial(String),
    Tcp(String),
}

/// Builder for an [`SdriqReceiver`].
///
/// # Example
///
/// ```no_run
/// # use sdriq_protocol::builder::SdriqBuilder;
/// # async fn example() -> sdriq_core::Result<()> {
/// let mut rx = SdriqBuilder::new()
///     .serial_port("/dev/ttyUSB0")
///     .timeout(std::time::Duration::from_millis(250))
///     .build()
///     .await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct SdriqBuilder {
    endpoint: Option<Endpoint>,
    baud_rate: u32,
    timeout: Duration,
    recv_capacity: usize,
}

impl Default for SdriqBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SdriqBuilder {
    /// Start a builder with default timeout, baud rate, and buffer size.
    pub fn new() -> Self {
        SdriqBuilder {
            endpoint: None,
            baud_rate: DEFAULT_BAUD_RATE,
            timeout: DEFAULT_TIMEOUT,
            recv_capacity: DEFAULT_RECV_CAPACITY,
        }
    }

    /// Connect over a serial device node, e.g. `/dev/ttyUSB0`.
    pub fn serial_port(mut self, path: impl Into<String>) -> Self {
        self.endpoint = Some(Endpoint::Serial(path.into()));
        self
    }

    /// Connect over a serial-to-TCP bridge, e.g. `"192.168.0.10:50000"`.
    pub fn tcp_addr(mut self, addr: impl Into<String>) -> Self {
        self.endpoint = Some(Endpoint::Tcp(addr.into()));
        self
    }

    /// Baud rate for serial endpoints. Ignored for TCP.
    pub fn baud_rate(mut self, baud_rate: u32) -> Self {
        self.baud_rate = baud_rate;
        self
    }

    /// Per-transaction reply timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Capacity of the transport read buffer.
    pub fn recv_capacity(mut self, capacity: usize) -> Self {
        self.recv_capacity = capacity;
        self
    }

    /// Open the configured endpoint and wrap it in a receiver handle.
    pub async fn build(self) -> Result<SdriqReceiver> {
        let transport: Box<dyn Transport> = match &self.endpoint {
            Some(Endpoint::Serial(path)) => {
                Box::new(SerialTransport::open_with_baud(path, self.baud_rate).await?)
            }
            Some(Endpoint::Tcp(addr)) => Box::new(TcpTransport::connect(addr).await?),
            None => {
                return Err(Error::InvalidParameter(
                    "no serial port or TCP address configured".into(),
                ))
            }
        };
        Ok(self.build_with_transport(transport))
    }

    /// Wrap an already-open transport in a receiver handle.
    ///
    /// This is the injection point for the mock transport in tests.
    pub fn build_with_transport(self, transport: Box<dyn Transport>) -> SdriqReceiver {
        debug!(
            timeout_ms = self.timeout.as_millis() as u64,
            recv_capacity = self.recv_capacity,
            "building receiver"
        );
        let engine = ControlEngine::with_config(transport, self.timeout, self.recv_capacity);
        SdriqReceiver::new(engine)
    }
}
