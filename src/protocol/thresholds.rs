//! # Threshold Encoding
//!
//! The peripheral fires an event whenever the shaft crosses one of up to
//! eight programmed position thresholds. Two encodings live here: the
//! threshold table itself (degrees converted to wire ticks) and the
//! MSB-first bitmask that selects which table slots are armed.

use crate::error::{Result, RotaryLinkError};
use crate::protocol::command::Command;
use crate::units::degrees_to_ticks;

/// Number of flags an enable mask must carry, one per table slot
pub const ENABLE_FLAG_COUNT: usize = 8;

/// Threshold count the peripheral is documented to accept
///
/// The wire format itself carries up to 255 entries; the device firmware
/// stores only this many. Larger tables encode fine and get refused (or
/// silently clipped) on the other end, so callers are warned rather than
/// stopped.
pub const MAX_THRESHOLDS: usize = 6;

/// Pack per-slot enable flags into the wire bitmask, first flag in the
/// most significant bit
///
/// # Errors
///
/// Returns [`RotaryLinkError::InvalidArgument`] unless exactly
/// [`ENABLE_FLAG_COUNT`] flags are given. The mask byte has no notion of
/// "unspecified"; a short flag list would silently disarm the missing
/// slots.
///
/// # Examples
///
/// ```
/// use rotary_link::protocol::thresholds::pack_enable_mask;
///
/// let flags = [true, false, true, true, false, false, true, true];
/// assert_eq!(pack_enable_mask(&flags).unwrap(), 0b1011_0011);
/// ```
pub fn pack_enable_mask(flags: &[bool]) -> Result<u8> {
    if flags.len() != ENABLE_FLAG_COUNT {
        return Err(RotaryLinkError::InvalidArgument(format!(
            "enable mask needs exactly {ENABLE_FLAG_COUNT} flags, got {}",
            flags.len()
        )));
    }

    Ok(flags
        .iter()
        .fold(0u8, |mask, &flag| (mask << 1) | u8::from(flag)))
}

/// Encode a threshold table command from degree values
///
/// # Errors
///
/// Returns [`RotaryLinkError::InvalidArgument`] if any degree value cannot
/// be expressed as a 16-bit tick, or if the table exceeds the 255 entries
/// the count byte can describe.
pub fn encode_thresholds(degrees: &[f64]) -> Result<Vec<u8>> {
    if degrees.len() > usize::from(u8::MAX) {
        return Err(RotaryLinkError::InvalidArgument(format!(
            "threshold table of {} entries exceeds the wire limit of {}",
            degrees.len(),
            u8::MAX
        )));
    }

    let ticks = degrees
        .iter()
        .map(|&value| degrees_to_ticks(value))
        .collect::<Result<Vec<i16>>>()?;

    Ok(Command::SetThresholds(ticks).encode())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pack_enable_mask_msb_first() {
        let flags = [true, false, true, true, false, false, true, true];
        assert_eq!(pack_enable_mask(&flags).unwrap(), 179);
    }

    #[test]
    fn test_pack_enable_mask_extremes() {
        assert_eq!(pack_enable_mask(&[false; 8]).unwrap(), 0);
        assert_eq!(pack_enable_mask(&[true; 8]).unwrap(), 255);

        let first_only = [true, false, false, false, false, false, false, false];
        assert_eq!(pack_enable_mask(&first_only).unwrap(), 0b1000_0000);

        let last_only = [false, false, false, false, false, false, false, true];
        assert_eq!(pack_enable_mask(&last_only).unwrap(), 0b0000_0001);
    }

    #[test]
    fn test_pack_enable_mask_rejects_wrong_length() {
        assert!(pack_enable_mask(&[]).is_err());
        assert!(pack_enable_mask(&[true; 6]).is_err());
        assert!(pack_enable_mask(&[true; 7]).is_err());
        assert!(pack_enable_mask(&[true; 9]).is_err());
    }

    #[test]
    fn test_encode_thresholds_single_value() {
        // 90° is tick 256
        assert_eq!(
            encode_thresholds(&[90.0]).unwrap(),
            vec![b'T', 1, 0x00, 0x01]
        );
    }

    #[test]
    fn test_encode_thresholds_orders_values() {
        let frame = encode_thresholds(&[-90.0, 45.0]).unwrap();
        assert_eq!(frame, vec![b'T', 2, 0x00, 0xFF, 0x80, 0x00]);
    }

    #[test]
    fn test_encode_thresholds_empty_table() {
        assert_eq!(encode_thresholds(&[]).unwrap(), vec![b'T', 0]);
    }

    #[test]
    fn test_encode_thresholds_rejects_bad_degrees() {
        assert!(encode_thresholds(&[90.0, 1.0e6]).is_err());
        assert!(encode_thresholds(&[f64::NAN]).is_err());
    }

    #[test]
    fn test_encode_thresholds_rejects_oversized_table() {
        let degrees = vec![0.0; 256];
        assert!(encode_thresholds(&degrees).is_err());
    }
}
