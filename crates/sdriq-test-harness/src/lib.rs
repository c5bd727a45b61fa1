//! Mock transport for deterministic testing of the SDR-IQ protocol engine.
//!
//! [`MockLink`] implements the [`Transport`] trait with pre-loaded
//! request/reply exchanges. This lets you test frame encoding, transaction
//! sequencing, and response parsing without real hardware.
//!
//! # Example
//!
//! ```
//! use sdriq_test_harness::MockLink;
//!
//! let mut link = MockLink::new();
//! // When the engine sends a device-name request, reply with "SDR-IQ\0".
//! link.expect(
//!     &[0x04, 0x20, 0x01, 0x00],
//!     &[0x0B, 0x00, 0x01, 0x00, b'S', b'D', b'R', b'-', b'I', b'Q', 0x00],
//! );
//! ```

pub mod mock_link;

pub use mock_link::MockLink;
