//! # Response Decoding
//!
//! The peripheral never frames its replies; each command that answers at all
//! answers with a fixed-width payload the host must know to expect. This
//! module decodes the three synchronous reply shapes: the handshake
//! identity byte, one-byte acks, and two-byte position reads.

use crate::error::{Result, RotaryLinkError};
use crate::units::ticks_to_degrees;

/// Identity byte the peripheral returns to a handshake request
pub const HANDSHAKE_ACK: u8 = 217;
/// Ack byte reporting that an acknowledged command was applied
pub const ACK_OK: u8 = 1;
/// Width of an ack reply
pub const ACK_BYTES: usize = 1;
/// Width of a position reply (signed 16-bit tick, little-endian)
pub const POSITION_BYTES: usize = 2;

/// Check the handshake reply byte against the expected identity
///
/// # Errors
///
/// Returns [`RotaryLinkError::HandshakeFailed`] carrying the offending byte
/// when anything but the identity byte comes back. A failed handshake means
/// the far end is not a rotary encoder module and the session must not be
/// used.
pub fn decode_handshake(byte: u8) -> Result<()> {
    if byte == HANDSHAKE_ACK {
        Ok(())
    } else {
        Err(RotaryLinkError::HandshakeFailed(byte))
    }
}

/// Interpret an ack byte
///
/// Only [`ACK_OK`] counts as success; every other value reports that the
/// peripheral declined the command. A declined command is an outcome, not a
/// protocol failure, so this returns a plain `bool`.
pub fn decode_ack(byte: u8) -> bool {
    byte == ACK_OK
}

/// Decode a position reply into degrees
pub fn decode_position(raw: &[u8; POSITION_BYTES]) -> f64 {
    ticks_to_degrees(i16::from_le_bytes(*raw))
}
