//! Control-item catalog.
//!
//! Control items are 16-bit addressable properties on the receiver. The
//! identifiers and parameter codes below are the binding contract with the
//! device firmware and must track the hardware interface specification, not
//! driver convenience.

/// Device model name (ASCII string reply, NUL terminator not guaranteed).
pub const CI_TARGET_NAME: u16 = 0x0001;
/// Serial number (ASCII string reply).
pub const CI_TARGET_SERIAL: u16 = 0x0002;
/// Control protocol interface version (u16 little-endian reply).
pub const CI_INTERFACE_VERSION: u16 = 0x0003;
/// Firmware/boot-code version. Takes a one-byte selector parameter.
pub const CI_FIRMWARE_VERSION: u16 = 0x0004;
/// Receiver status code (one status byte reply).
pub const CI_STATUS: u16 = 0x0005;
/// Human-readable status/error string.
pub const CI_STATUS_STRING: u16 = 0x0006;
/// Receiver run/idle state. Parameters: channel, state, mode, block count.
pub const CI_RECEIVER_STATE: u16 = 0x0018;
/// Receiver center frequency. Parameters: channel, u32 LE hertz.
pub const CI_RECEIVER_FREQUENCY: u16 = 0x0020;
/// RF gain. Parameters: mode byte, value byte.
pub const CI_RF_GAIN: u16 = 0x0038;
/// ADC sample rate. Parameters: channel, u32 LE hertz.
pub const CI_ADC_SAMPLE_RATE: u16 = 0x00B0;

/// Selector parameter to [`CI_FIRMWARE_VERSION`]: boot code version.
pub const FW_VER_BOOT_CODE: u8 = 0x00;
/// Selector parameter to [`CI_FIRMWARE_VERSION`]: application firmware version.
pub const FW_VER_FIRMWARE: u8 = 0x01;

/// Fixed channel id selecting the single receiver channel.
pub const CHANNEL_ID: u8 = 0x81;
/// Channel selector used by frequency and sample-rate items.
pub const FREQ_CHANNEL: u8 = 0x00;

/// Receiver state code: idle (capture stopped).
pub const RX_STATE_IDLE: u8 = 0x01;
/// Receiver state code: running (capturing).
pub const RX_STATE_RUN: u8 = 0x02;

/// Capture mode byte: contiguous streaming until stopped.
pub const CAPTURE_CONTIGUOUS: u8 = 0x00;
/// Capture mode byte: one-shot, a bounded number of blocks.
pub const CAPTURE_ONE_SHOT: u8 = 0x01;

/// RF gain mode byte: fixed gain (0, -10, -20, or -30 dB only).
pub const RF_GAIN_FIXED: u8 = 0x00;
/// RF gain mode byte: manual AD8370 gain.
pub const RF_GAIN_MANUAL: u8 = 0x01;
/// Bit 7 of the manual gain value byte enables the front-end attenuator.
pub const RF_GAIN_ATTENUATOR_BIT: u8 = 0x80;

/// Broad grouping of a control item's role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemCategory {
    /// Read-only identity data (name, serial, versions).
    Identity,
    /// Runtime status reporting.
    Status,
    /// Receiver configuration and run control.
    ReceiverControl,
}

/// A catalog entry describing one control item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlItem {
    /// 16-bit control-item identifier.
    pub id: u16,
    /// Human-readable name, used in logs and the test app.
    pub name: &'static str,
    /// Broad role grouping.
    pub category: ItemCategory,
}

/// The full control-item catalog, ordered by id.
pub const CONTROL_ITEMS: &[ControlItem] = &[
    ControlItem {
        id: CI_TARGET_NAME,
        name: "device name",
        category: ItemCategory::Identity,
    },
    ControlItem {
        id: CI_TARGET_SERIAL,
        name: "serial number",
        category: ItemCategory::Identity,
    },
    ControlItem {
        id: CI_INTERFACE_VERSION,
        name: "interface version",
        category: ItemCategory::Identity,
    },
    ControlItem {
        id: CI_FIRMWARE_VERSION,
        name: "firmware version",
        category: ItemCategory::Identity,
    },
    ControlItem {
        id: CI_STATUS,
        name: "status code",
        category: ItemCategory::Status,
    },
    ControlItem {
        id: CI_STATUS_STRING,
        name: "status string",
        category: ItemCategory::Status,
    },
    ControlItem {
        id: CI_RECEIVER_STATE,
        name: "receiver state",
        category: ItemCategory::ReceiverControl,
    },
    ControlItem {
        id: CI_RECEIVER_FREQUENCY,
        name: "receiver frequency",
        category: ItemCategory::ReceiverControl,
    },
    ControlItem {
        id: CI_RF_GAIN,
        name: "RF gain",
        category: ItemCategory::ReceiverControl,
    },
    ControlItem {
        id: CI_ADC_SAMPLE_RATE,
        name: "ADC sample rate",
        category: ItemCategory::ReceiverControl,
    },
];

/// Look up a catalog entry by control-item id.
pub fn lookup(id: u16) -> Option<&'static ControlItem> {
    CONTROL_ITEMS.iter().find(|item| item.id == id)
}

/// Human-readable name for a control item, for log lines.
///
/// Falls back to `"unknown"` for ids outside the catalog.
pub fn item_name(id: u16) -> &'static str {
    lookup(id).map_or("unknown", |item| item.name)
}
