//! Shared types for the SDR-IQ driver.

use std::fmt;

/// Identity and firmware information read from the receiver.
///
/// Populated once per session by the device-info resolver; fields the device
/// does not report (undersized version replies) stay at their defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceInfo {
    /// Model name string, e.g. `"SDR-IQ"`.
    pub model: String,
    /// Serial number string.
    pub serial: String,
    /// Control protocol interface version.
    pub interface_version: u16,
    /// Boot code version.
    pub bootcode_version: u16,
    /// Application firmware version.
    pub firmware_version: u16,
}

/// Capture mode requested when starting the receiver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureMode {
    /// Stream sample blocks until stopped.
    Contiguous,
    /// Capture a fixed number of blocks, then return to idle.
    OneShot(u8),
}

impl fmt::Display for CaptureMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaptureMode::Contiguous => write!(f, "contiguous"),
            CaptureMode::OneShot(n) => write!(f, "one-shot({n})"),
        }
    }
}

/// State of the capture session, as tracked by the capture controller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CaptureState {
    /// No capture in progress. The initial state.
    #[default]
    Idle,
    /// The receiver is running in the given mode.
    Running(CaptureMode),
}

impl CaptureState {
    /// Short lowercase name, used in transition error messages.
    pub fn name(&self) -> &'static str {
        match self {
            CaptureState::Idle => "idle",
            CaptureState::Running(_) => "running",
        }
    }
}

/// Receiver status as reported by control item 0x0005.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReceiverStatus {
    /// Receiver idle, ready for commands.
    Idle,
    /// Receiver busy capturing data.
    Busy,
    /// Loading the AD6620 filter coefficients.
    LoadingFilter,
    /// Boot mode, idle.
    BootIdle,
    /// Boot mode, programming flash.
    BootProgramming,
    /// ADC input overload detected.
    AdcOverload,
    /// Boot mode flash programming error.
    BootProgramError,
    /// A status code not listed in the interface specification.
    Unknown(u8),
}

impl ReceiverStatus {
    /// Map a raw status code byte to a status value.
    pub fn from_code(code: u8) -> Self {
        match code {
            0x0B => ReceiverStatus::Idle,
            0x0C => ReceiverStatus::Busy,
            0x0D => ReceiverStatus::LoadingFilter,
            0x0E => ReceiverStatus::BootIdle,
            0x0F => ReceiverStatus::BootProgramming,
            0x20 => ReceiverStatus::AdcOverload,
            0x80 => ReceiverStatus::BootProgramError,
            other => ReceiverStatus::Unknown(other),
        }
    }

    /// The raw status code byte for this status value.
    pub fn code(&self) -> u8 {
        match self {
            ReceiverStatus::Idle => 0x0B,
            ReceiverStatus::Busy => 0x0C,
            ReceiverStatus::LoadingFilter => 0x0D,
            ReceiverStatus::BootIdle => 0x0E,
            ReceiverStatus::BootProgramming => 0x0F,
            ReceiverStatus::AdcOverload => 0x20,
            ReceiverStatus::BootProgramError => 0x80,
            ReceiverStatus::Unknown(code) => *code,
        }
    }
}

impl fmt::Display for ReceiverStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReceiverStatus::Idle => write!(f, "idle"),
            ReceiverStatus::Busy => write!(f, "busy"),
            ReceiverStatus::LoadingFilter => write!(f, "loading filter"),
            ReceiverStatus::BootIdle => write!(f, "boot idle"),
            ReceiverStatus::BootProgramming => write!(f, "boot programming"),
            ReceiverStatus::AdcOverload => write!(f, "ADC overload"),
            ReceiverStatus::BootProgramError => write!(f, "boot program error"),
            ReceiverStatus::Unknown(code) => write!(f, "unknown status 0x{code:02X}"),
        }
    }
}

/// RF gain setting for control item 0x0038.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RfGain {
    /// Fixed gain mode. Only 0, -10, -20, and -30 dB are accepted by the
    /// hardware.
    Fixed(i8),
    /// Manual AD8370 gain mode.
    Manual {
        /// Linear gain value, 0..=127.
        gain: u8,
        /// Enable the fixed front-end 10 dB attenuator.
        attenuator: bool,
    },
}
