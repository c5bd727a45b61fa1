//! Control-item frame encoder/decoder.
//!
//! The SDR-IQ exchanges binary frames over a half-duplex byte link. Every
//! frame starts with a 16-bit header that packs a 13-bit total length and a
//! 3-bit message type, followed by a 16-bit little-endian control-item
//! identifier and an optional parameter block.
//!
//! # Frame format
//!
//! ```text
//! byte 0: length bits 7..0
//! byte 1: [type 7..5 | length bits 12..8]
//! byte 2: control item bits 7..0
//! byte 3: control item bits 15..8
//! byte 4..: parameters
//! ```
//!
//! The length field counts the header, so the maximum parameter block is
//! 8191 - 4 bytes. The meaning of the 3-bit type depends on direction; the
//! host and target tag spaces are listed below.

use bytes::{BufMut, BytesMut};
use sdriq_core::{Error, Result};

/// Size of the frame header in bytes.
pub const HEADER_LEN: usize = 4;

/// Maximum total frame length representable in the 13-bit length field.
pub const MAX_FRAME_LEN: usize = 8191;

/// Total on-wire size of a data-item block, whose header declares length 0.
pub const DATA_BLOCK_LEN: usize = 8194;

/// Length declared by a NAK reply: a bare 2-byte header and nothing else.
pub const NAK_LEN: usize = 2;

// Host -> target message types.
pub const HOST_SET_CTRL_ITEM: u8 = 0x00;
pub const HOST_REQ_CTRL_ITEM: u8 = 0x01;
pub const HOST_REQ_CTRL_ITEM_RANGE: u8 = 0x02;
pub const HOST_DATA_ITEM_ACK: u8 = 0x03;
pub const HOST_DATA_ITEM_0: u8 = 0x04;

// Target -> host message types.
pub const TARGET_RESP_CTRL_ITEM: u8 = 0x00;
pub const TARGET_UNSOL_CTRL_ITEM: u8 = 0x01;
pub const TARGET_RESP_CTRL_ITEM_RANGE: u8 = 0x02;
pub const TARGET_DATA_ACK: u8 = 0x03;
pub const TARGET_DATA_ITEM_0: u8 = 0x04;

/// A decoded control-item frame.
///
/// The protocol carries no source/destination addressing; direction is
/// implied by which end sent the frame, and `msg_type` is interpreted in
/// that direction's tag space.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    /// 3-bit message type tag.
    pub msg_type: u8,
    /// 16-bit control-item identifier.
    pub item: u16,
    /// Parameter bytes (may be empty).
    pub data: Vec<u8>,
}

impl Message {
    /// Returns `true` for a solicited control-item response.
    pub fn is_response(&self) -> bool {
        self.msg_type == TARGET_RESP_CTRL_ITEM || self.msg_type == TARGET_RESP_CTRL_ITEM_RANGE
    }

    /// Returns `true` for an unsolicited control-item broadcast.
    pub fn is_unsolicited(&self) -> bool {
        self.msg_type == TARGET_UNSOL_CTRL_ITEM
    }

    /// Returns `true` for a sample data-item frame (types 4 through 7).
    pub fn is_data_item(&self) -> bool {
        self.msg_type >= TARGET_DATA_ITEM_0
    }
}

/// Encode a frame ready for transmission.
///
/// Computes the total length up front and writes into an owned buffer of
/// exactly that size. Fails with [`Error::LengthOverflow`] when the header
/// plus parameters would not fit the 13-bit length field.
///
/// # Example
///
/// ```
/// use sdriq_protocol::frame::{encode, HOST_REQ_CTRL_ITEM};
///
/// // Request the device name control item (0x0001).
/// let bytes = encode(HOST_REQ_CTRL_ITEM, 0x0001, &[]).unwrap();
/// assert_eq!(bytes, vec![0x04, 0x20, 0x01, 0x00]);
/// ```
pub fn encode(msg_type: u8, item: u16, params: &[u8]) -> Result<Vec<u8>> {
    let length = HEADER_LEN + params.len();
    if length > MAX_FRAME_LEN {
        return Err(Error::LengthOverflow { length });
    }

    let mut buf = BytesMut::with_capacity(length);
    buf.put_u8((length & 0xFF) as u8);
    buf.put_u8(((msg_type & 0x07) << 5) | ((length >> 8) & 0x1F) as u8);
    buf.put_u16_le(item);
    buf.put_slice(params);
    Ok(buf.to_vec())
}

/// Decode one complete frame from a byte buffer.
///
/// Fails with [`Error::FrameTooShort`] when the buffer cannot hold a header
/// and with [`Error::TruncatedFrame`] when the declared length exceeds the
/// bytes available. Trailing bytes beyond the declared length are ignored.
///
/// # Example
///
/// ```
/// use sdriq_protocol::frame::decode;
///
/// let msg = decode(&[0x04, 0x20, 0x01, 0x00]).unwrap();
/// assert_eq!(msg.msg_type, 1);
/// assert_eq!(msg.item, 0x0001);
/// assert!(msg.data.is_empty());
/// ```
pub fn decode(buf: &[u8]) -> Result<Message> {
    if buf.len() < HEADER_LEN {
        return Err(Error::FrameTooShort { len: buf.len() });
    }

    let length = buf[0] as usize | ((buf[1] & 0x1F) as usize) << 8;
    let msg_type = (buf[1] >> 5) & 0x07;
    let item = u16::from_le_bytes([buf[2], buf[3]]);

    if length > buf.len() {
        return Err(Error::TruncatedFrame {
            declared: length,
            available: buf.len(),
        });
    }

    let data = if length > HEADER_LEN {
        buf[HEADER_LEN..length].to_vec()
    } else {
        Vec::new()
    };

    Ok(Message {
        msg_type,
        item,
        data,
    })
}

/// Peek the type tag and on-wire frame length from a partial buffer.
///
/// Returns `None` until at least the two header bytes are available. A
/// data-item frame declares length 0 in the header to mean a full
/// [`DATA_BLOCK_LEN`]-byte block; this is resolved here so callers can
/// count how many bytes to accumulate or discard.
pub fn peek_header(buf: &[u8]) -> Option<(u8, usize)> {
    if buf.len() < 2 {
        return None;
    }
    let length = buf[0] as usize | ((buf[1] & 0x1F) as usize) << 8;
    let msg_type = (buf[1] >> 5) & 0x07;
    if msg_type >= TARGET_DATA_ITEM_0 && length == 0 {
        return Some((msg_type, DATA_BLOCK_LEN));
    }
    Some((msg_type, length))
}
