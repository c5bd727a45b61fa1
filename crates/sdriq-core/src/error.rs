//! Error types for the SDR-IQ driver.
//!
//! All fallible operations across the workspace return [`Result<T>`], which
//! uses [`Error`] as the error type. Transport-layer, codec-layer, and
//! session-layer failures are all captured here.

/// The error type for all SDR-IQ driver operations.
///
/// Every failure is recoverable from the caller's perspective: a timeout or
/// a malformed frame is reported, never asserted on, and leaves the driver
/// in a state where the next transaction can be attempted.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A transport-level error (serial port, TCP bridge).
    #[error("transport error: {0}")]
    Transport(String),

    /// Timed out waiting for a reply from the receiver.
    ///
    /// This typically means the device is unplugged, still booting, or the
    /// configured timeout is shorter than the device's turnaround time.
    #[error("timeout waiting for reply")]
    Timeout,

    /// An outbound message would not fit the 13-bit frame length field.
    #[error("message length {length} exceeds the 8191-byte frame limit")]
    LengthOverflow {
        /// Total frame length (header plus parameters) that was requested.
        length: usize,
    },

    /// An inbound buffer is too short to contain a frame header.
    #[error("frame too short: {len} bytes, need at least 4")]
    FrameTooShort {
        /// Number of bytes actually available.
        len: usize,
    },

    /// An inbound frame's declared length exceeds the bytes available.
    #[error("truncated frame: header declares {declared} bytes, buffer holds {available}")]
    TruncatedFrame {
        /// Length from the frame header.
        declared: usize,
        /// Bytes actually in the buffer.
        available: usize,
    },

    /// The device rejected a control item with a NAK (bare 2-byte header).
    #[error("device NAK for control item 0x{item:04X}")]
    Nak {
        /// The control item the rejected request addressed.
        item: u16,
    },

    /// A capture start/stop was called out of order.
    ///
    /// The controller rejects the call without contacting the device.
    #[error("invalid capture transition: {from} -> {to}")]
    InvalidTransition {
        from: &'static str,
        to: &'static str,
    },

    /// An invalid parameter was passed to a driver method.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// A protocol-level error not covered by a more specific variant.
    #[error("protocol error: {0}")]
    Protocol(String),

    /// No connection to the device has been established.
    #[error("not connected")]
    NotConnected,

    /// The connection to the device was lost unexpectedly.
    #[error("connection lost")]
    ConnectionLost,

    /// An underlying I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A convenience `Result` alias using [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;
