//! Serial port transport for the SDR-IQ.
//!
//! The SDR-IQ connects over an FTDI USB-serial bridge and presents as a
//! character device (`/dev/ttyUSB*` on Linux, `COM*` on Windows). The link
//! parameters are fixed by the hardware: 8 data bits, 1 stop bit, no
//! parity, no flow control. Only the baud rate is configurable, and on the
//! FTDI FIFO it is effectively cosmetic -- 230400 is the conventional value.

use async_trait::async_trait;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio_serial::{SerialPortBuilderExt, SerialStream};

use sdriq_core::error::{Error, Result};
use sdriq_core::transport::Transport;

/// Conventional baud rate for the SDR-IQ's FTDI bridge.
pub const DEFAULT_BAUD_RATE: u32 = 230_400;

/// Serial port transport for the SDR-IQ device node.
pub struct SerialTransport {
    /// The underlying serial stream, `None` after `close()`.
    port: Option<SerialStream>,
    /// Device path for logging.
    path: String,
}

impl SerialTransport {
    /// Open the device node at the conventional baud rate.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use sdriq_transport::SerialTransport;
    /// # async fn example() -> sdriq_core::Result<()> {
    /// let transport = SerialTransport::open("/dev/ttyUSB0").await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn open(path: &str) -> Result<Self> {
        Self::open_with_baud(path, DEFAULT_BAUD_RATE).await
    }

    /// Open the device node with an explicit baud rate.
    ///
    /// The remaining link parameters are always 8N1 with no flow control,
    /// as required by the hardware.
    pub async fn open_with_baud(path: &str, baud_rate: u32) -> Result<Self> {
        tracing::debug!(path = %path, baud_rate, "opening serial port");

        let stream = tokio_serial::new(path, baud_rate)
            .data_bits(tokio_serial::DataBits::Eight)
            .stop_bits(tokio_serial::StopBits::One)
            .parity(tokio_serial::Parity::None)
            .flow_control(tokio_serial::FlowControl::None)
            .open_native_async()
            .map_err(|e| {
                tracing::error!(path = %path, error = %e, "failed to open serial port");
                Error::Transport(format!("failed to open serial port {path}: {e}"))
            })?;

        tracing::info!(path = %path, baud_rate, "serial port opened");

        Ok(Self {
            port: Some(stream),
            path: path.to_string(),
        })
    }

    /// The device path this transport was opened on.
    pub fn path(&self) -> &str {
        &self.path
    }
}

#[async_trait]
impl Transport for SerialTransport {
    async fn send(&mut self, data: &[u8]) -> Result<()> {
        let port = self.port.as_mut().ok_or(Error::NotConnected)?;

        tracing::trace!(path = %self.path, bytes = data.len(), data = ?data, "sending");

        port.write_all(data).await.map_err(map_io_error)?;
        port.flush().await.map_err(map_io_error)?;

        Ok(())
    }

    async fn receive(&mut self, buf: &mut [u8], timeout: Duration) -> Result<usize> {
        let port = self.port.as_mut().ok_or(Error::NotConnected)?;

        match tokio::time::timeout(timeout, port.read(buf)).await {
            Ok(Ok(n)) => {
                tracing::trace!(path = %self.path, bytes = n, data = ?&buf[..n], "received");
                Ok(n)
            }
            Ok(Err(e)) => {
                tracing::error!(path = %self.path, error = %e, "read failed");
                Err(map_io_error(e))
            }
            Err(_) => {
                tracing::trace!(
                    path = %self.path,
                    timeout_ms = timeout.as_millis(),
                    "timeout waiting for data"
                );
                Err(Error::Timeout)
            }
        }
    }

    async fn close(&mut self) -> Result<()> {
        if let Some(mut port) = self.port.take() {
            tracing::debug!(path = %self.path, "closing serial port");
            if let Err(e) = port.flush().await {
                tracing::warn!(path = %self.path, error = %e, "flush before close failed");
            }
            // Dropping the stream closes the device node.
        }
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.port.is_some()
    }
}

fn map_io_error(e: std::io::Error) -> Error {
    match e.kind() {
        std::io::ErrorKind::BrokenPipe | std::io::ErrorKind::NotConnected => Error::ConnectionLost,
        _ => Error::Io(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn open_nonexistent_device_fails() {
        let result = SerialTransport::open("/dev/nonexistent-sdriq").await;
        assert!(matches!(result, Err(Error::Transport(_))));
    }

    #[test]
    fn default_baud_rate() {
        assert_eq!(DEFAULT_BAUD_RATE, 230_400);
    }
}
