//! Parameter-block builders and reply parsers for individual control items.
//!
//! The frame codec handles the outer header; these helpers handle the
//! per-item parameter layouts. Builders produce the parameter bytes for a
//! set or request frame, parsers interpret the parameter bytes of a reply.

use sdriq_core::types::{CaptureMode, ReceiverStatus, RfGain};
use sdriq_core::{Error, Result};

use crate::items::{
    CAPTURE_CONTIGUOUS, CAPTURE_ONE_SHOT, CHANNEL_ID, FREQ_CHANNEL, RF_GAIN_ATTENUATOR_BIT,
    RF_GAIN_FIXED, RF_GAIN_MANUAL, RX_STATE_IDLE, RX_STATE_RUN,
};

/// Parameters for a receiver-state set that starts capturing.
pub fn start_capture_params(mode: CaptureMode) -> [u8; 4] {
    match mode {
        CaptureMode::Contiguous => [CHANNEL_ID, RX_STATE_RUN, CAPTURE_CONTIGUOUS, 0x00],
        CaptureMode::OneShot(blocks) => [CHANNEL_ID, RX_STATE_RUN, CAPTURE_ONE_SHOT, blocks],
    }
}

/// Parameters for a receiver-state set that stops capturing.
pub fn stop_capture_params() -> [u8; 4] {
    [CHANNEL_ID, RX_STATE_IDLE, 0x00, 0x00]
}

/// Parameters for a frequency or sample-rate set: channel selector followed
/// by the value in hertz, little-endian.
pub fn tuned_value_params(hz: u32) -> [u8; 5] {
    let le = hz.to_le_bytes();
    [FREQ_CHANNEL, le[0], le[1], le[2], le[3]]
}

/// Request parameters selecting the channel for a frequency or sample-rate
/// query.
pub fn tuned_value_request_params() -> [u8; 1] {
    [FREQ_CHANNEL]
}

/// Parse a frequency or sample-rate reply: channel selector echo followed
/// by the value in hertz, little-endian.
pub fn parse_tuned_value(data: &[u8]) -> Result<u32> {
    if data.len() < 5 {
        return Err(Error::Protocol(format!(
            "tuned-value reply too short: {} bytes",
            data.len()
        )));
    }
    Ok(u32::from_le_bytes([data[1], data[2], data[3], data[4]]))
}

/// Parameters for an RF gain set.
///
/// Fixed mode accepts only the four hardware gain steps; anything else is
/// rejected before it reaches the device. Manual mode accepts a 7-bit gain
/// value with the attenuator flag folded into bit 7.
pub fn rf_gain_params(gain: RfGain) -> Result<[u8; 2]> {
    match gain {
        RfGain::Fixed(db) => {
            if !matches!(db, 0 | -10 | -20 | -30) {
                return Err(Error::InvalidParameter(format!(
                    "fixed RF gain must be 0, -10, -20, or -30 dB, got {db}"
                )));
            }
            Ok([RF_GAIN_FIXED, db as u8])
        }
        RfGain::Manual { gain, attenuator } => {
            if gain > 0x7F {
                return Err(Error::InvalidParameter(format!(
                    "manual RF gain must be 0..=127, got {gain}"
                )));
            }
            let mut value = gain;
            if attenuator {
                value |= RF_GAIN_ATTENUATOR_BIT;
            }
            Ok([RF_GAIN_MANUAL, value])
        }
    }
}

/// Parse an RF gain reply into the mode it reports.
pub fn parse_rf_gain(data: &[u8]) -> Result<RfGain> {
    if data.len() < 2 {
        return Err(Error::Protocol(format!(
            "RF gain reply too short: {} bytes",
            data.len()
        )));
    }
    match data[0] {
        RF_GAIN_FIXED => Ok(RfGain::Fixed(data[1] as i8)),
        RF_GAIN_MANUAL => Ok(RfGain::Manual {
            gain: data[1] & !RF_GAIN_ATTENUATOR_BIT,
            attenuator: data[1] & RF_GAIN_ATTENUATOR_BIT != 0,
        }),
        other => Err(Error::Protocol(format!(
            "unknown RF gain mode 0x{other:02X}"
        ))),
    }
}

/// Parse a status reply into its status code.
pub fn parse_status(data: &[u8]) -> Result<ReceiverStatus> {
    let code = data
        .first()
        .ok_or_else(|| Error::Protocol("status reply carried no status byte".into()))?;
    Ok(ReceiverStatus::from_code(*code))
}

/// Parse an ASCII string reply, stopping at the first NUL if one is present.
pub fn parse_string(data: &[u8]) -> String {
    let end = data.iter().position(|&b| b == 0).unwrap_or(data.len());
    String::from_utf8_lossy(&data[..end]).into_owned()
}

/// Parse an interface-version reply.
///
/// The version is a plain little-endian u16. Replies shorter than that are
/// treated as "not reported" rather than an error; the resolver leaves the
/// field at its default.
pub fn parse_interface_version(data: &[u8]) -> Option<u16> {
    if data.len() < 2 {
        return None;
    }
    Some(u16::from_le_bytes([data[0], data[1]]))
}

/// Parse a firmware/boot-code version reply.
///
/// The device echoes the one-byte selector before the little-endian u16
/// version. Short replies are treated as "not reported".
pub fn parse_firmware_version(data: &[u8]) -> Option<u16> {
    if data.len() < 3 {
        return None;
    }
    Some(u16::from_le_bytes([data[1], data[2]]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_contiguous_params() {
        assert_eq!(
            start_capture_params(CaptureMode::Contiguous),
            [0x81, 0x02, 0x00, 0x00]
        );
    }

    #[test]
    fn start_one_shot_params() {
        assert_eq!(
            start_capture_params(CaptureMode::OneShot(5)),
            [0x81, 0x02, 0x01, 0x05]
        );
    }

    #[test]
    fn stop_params() {
        assert_eq!(stop_capture_params(), [0x81, 0x01, 0x00, 0x00]);
    }

    #[test]
    fn tuned_value_round_trip() {
        // 14.010 MHz.
        let params = tuned_value_params(14_010_000);
        assert_eq!(params, [0x00, 0x90, 0xC6, 0xD5, 0x00]);
        assert_eq!(parse_tuned_value(&params).unwrap(), 14_010_000);
    }

    #[test]
    fn tuned_value_reply_too_short() {
        assert!(matches!(
            parse_tuned_value(&[0x00, 0x90, 0xC6]),
            Err(Error::Protocol(_))
        ));
    }

    #[test]
    fn fixed_gain_steps() {
        assert_eq!(rf_gain_params(RfGain::Fixed(0)).unwrap(), [0x00, 0x00]);
        assert_eq!(rf_gain_params(RfGain::Fixed(-10)).unwrap(), [0x00, 0xF6]);
        assert_eq!(rf_gain_params(RfGain::Fixed(-30)).unwrap(), [0x00, 0xE2]);
    }

    #[test]
    fn fixed_gain_rejects_other_values() {
        assert!(matches!(
            rf_gain_params(RfGain::Fixed(-15)),
            Err(Error::InvalidParameter(_))
        ));
        assert!(matches!(
            rf_gain_params(RfGain::Fixed(5)),
            Err(Error::InvalidParameter(_))
        ));
    }

    #[test]
    fn manual_gain_packs_attenuator() {
        assert_eq!(
            rf_gain_params(RfGain::Manual {
                gain: 0x33,
                attenuator: false
            })
            .unwrap(),
            [0x01, 0x33]
        );
        assert_eq!(
            rf_gain_params(RfGain::Manual {
                gain: 0x33,
                attenuator: true
            })
            .unwrap(),
            [0x01, 0xB3]
        );
    }

    #[test]
    fn manual_gain_rejects_out_of_range() {
        assert!(matches!(
            rf_gain_params(RfGain::Manual {
                gain: 0x80,
                attenuator: false
            }),
            Err(Error::InvalidParameter(_))
        ));
    }

    #[test]
    fn rf_gain_reply_round_trip() {
        assert_eq!(
            parse_rf_gain(&[0x00, 0xF6]).unwrap(),
            RfGain::Fixed(-10)
        );
        assert_eq!(
            parse_rf_gain(&[0x01, 0xB3]).unwrap(),
            RfGain::Manual {
                gain: 0x33,
                attenuator: true
            }
        );
    }

    #[test]
    fn rf_gain_reply_errors() {
        assert!(matches!(parse_rf_gain(&[0x00]), Err(Error::Protocol(_))));
        assert!(matches!(
            parse_rf_gain(&[0x02, 0x00]),
            Err(Error::Protocol(_))
        ));
    }

    #[test]
    fn status_reply() {
        assert_eq!(parse_status(&[0x0B]).unwrap(), ReceiverStatus::Idle);
        assert_eq!(parse_status(&[0x20]).unwrap(), ReceiverStatus::AdcOverload);
        assert!(matches!(parse_status(&[]), Err(Error::Protocol(_))));
    }

    #[test]
    fn string_reply_stops_at_nul() {
        assert_eq!(parse_string(b"SDR-IQ\0junk"), "SDR-IQ");
        assert_eq!(parse_string(b"SDR-IQ"), "SDR-IQ");
        assert_eq!(parse_string(b""), "");
    }

    #[test]
    fn interface_version_reply() {
        assert_eq!(parse_interface_version(&[0x64, 0x00]), Some(100));
        assert_eq!(parse_interface_version(&[0x64]), None);
    }

    #[test]
    fn firmware_version_reply_echoes_selector() {
        assert_eq!(parse_firmware_version(&[0x01, 0x0F, 0x01]), Some(0x010F));
        assert_eq!(parse_firmware_version(&[0x01, 0x0F]), None);
    }
}
