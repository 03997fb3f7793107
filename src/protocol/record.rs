//! # Position Record Layout
//!
//! The peripheral reports positions in a fixed 6-byte record, whether they
//! arrive over the live stream or in a bulk log transfer. This module holds
//! the shared layout so both paths decode identically.

use crate::units::ticks_to_degrees;

/// Size of one position record on the wire: a 2-byte tick plus a 4-byte
/// millisecond timestamp
pub const RECORD_BYTES: usize = 6;

/// A single decoded position sample
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionSample {
    /// Peripheral-relative monotonic time in seconds
    pub timestamp_seconds: f64,
    /// Angular position in degrees at one-decimal resolution
    pub position_degrees: f64,
}

/// Decode one wire record: signed 16-bit tick count followed by an unsigned
/// 32-bit millisecond timestamp, both little-endian.
pub fn decode_record(raw: &[u8; RECORD_BYTES]) -> PositionSample {
    let tick = i16::from_le_bytes([raw[0], raw[1]]);
    let time_ms = u32::from_le_bytes([raw[2], raw[3], raw[4], raw[5]]);

    PositionSample {
        timestamp_seconds: f64::from(time_ms) / 1000.0,
        position_degrees: ticks_to_degrees(tick),
    }
}
