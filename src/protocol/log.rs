//! # Log Transfer Decoding
//!
//! A log request is answered with a little-endian `u32` byte count followed
//! by exactly that many bytes of 6-byte position records. The count is a
//! byte count, not a record count.

use crate::error::{Result, RotaryLinkError};
use crate::protocol::record::{decode_record, PositionSample, RECORD_BYTES};

/// Width of the byte-count header that opens a log transfer
pub const COUNT_BYTES: usize = 4;

/// Decode the transfer header into the number of record bytes that follow
pub fn decode_declared_bytes(raw: &[u8; COUNT_BYTES]) -> usize {
    u32::from_le_bytes(*raw) as usize
}

/// Decode a complete log body into samples, oldest first
///
/// # Errors
///
/// Returns [`RotaryLinkError::TruncatedLog`] when the body is not a whole
/// number of records. A peripheral that declares a ragged byte count lost
/// the tail of its own log; the partial record is not decodable.
pub fn decode_batch(body: &[u8]) -> Result<Vec<PositionSample>> {
    if body.len() % RECORD_BYTES != 0 {
        return Err(RotaryLinkError::TruncatedLog {
            expected: (body.len() / RECORD_BYTES + 1) * RECORD_BYTES,
            received: body.len(),
        });
    }

    Ok(body
        .chunks_exact(RECORD_BYTES)
        .map(|chunk| {
            let mut raw = [0u8; RECORD_BYTES];
            raw.copy_from_slice(chunk);
            decode_record(&raw)
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_declared_bytes_little_endian() {
        assert_eq!(decode_declared_bytes(&[12, 0, 0, 0]), 12);
        assert_eq!(decode_declared_bytes(&[0x00, 0x01, 0x00, 0x00]), 256);
        assert_eq!(decode_declared_bytes(&[0, 0, 0, 0]), 0);
    }

    #[test]
    fn test_decode_batch() {
        // two records: tick 256 @ 1000 ms, tick -256 @ 2000 ms
        let body = [
            0x00, 0x01, 0xE8, 0x03, 0x00, 0x00, //
            0x00, 0xFF, 0xD0, 0x07, 0x00, 0x00,
        ];

        let samples = decode_batch(&body).unwrap();

        assert_eq!(samples.len(), 2);
        assert_eq!(samples[0].position_degrees, 90.0);
        assert_eq!(samples[0].timestamp_seconds, 1.0);
        assert_eq!(samples[1].position_degrees, -90.0);
        assert_eq!(samples[1].timestamp_seconds, 2.0);
    }

    #[test]
    fn test_decode_empty_batch() {
        assert!(decode_batch(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_decode_ragged_batch_is_truncated() {
        let body = [0u8; 8];

        match decode_batch(&body) {
            Err(RotaryLinkError::TruncatedLog { expected, received }) => {
                assert_eq!(expected, 12);
                assert_eq!(received, 8);
            }
            other => panic!("expected TruncatedLog, got {other:?}"),
        }
    }
}
