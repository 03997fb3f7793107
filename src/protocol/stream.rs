//! # Stream Decoder
//!
//! Once streaming is enabled the peripheral pushes 6-byte position records
//! continuously, with no framing between them. The host drains its receive
//! buffer at its own cadence, so a drain can end mid-record; the decoder
//! keeps the partial tail and completes it from the next drain. Alignment
//! is positional: the stream is trusted from its first byte, and dropping
//! a partial tail would shift every later record onto garbage boundaries.

use bytes::{Buf, BytesMut};

use crate::protocol::record::{decode_record, PositionSample, RECORD_BYTES};

/// Incremental decoder for the continuous position stream
///
/// Feed it raw transport bytes in arrival order; it yields every completed
/// record and carries incomplete trailing bytes to the next call.
///
/// # Examples
///
/// ```
/// use rotary_link::protocol::stream::StreamDecoder;
///
/// let mut decoder = StreamDecoder::new();
///
/// // a record split across two transport reads
/// let first = decoder.feed(&[0x00, 0x01, 0xDC]);
/// assert!(first.is_empty());
///
/// let second = decoder.feed(&[0x05, 0x00, 0x00]);
/// assert_eq!(second.len(), 1);
/// assert_eq!(second[0].position_degrees, 90.0);
/// ```
#[derive(Debug, Default)]
pub struct StreamDecoder {
    carry: BytesMut,
}

impl StreamDecoder {
    /// Create a decoder with an empty carry buffer
    pub fn new() -> Self {
        Self {
            carry: BytesMut::with_capacity(RECORD_BYTES * 16),
        }
    }

    /// Consume freshly drained transport bytes and return the completed
    /// records, oldest first
    pub fn feed(&mut self, bytes: &[u8]) -> Vec<PositionSample> {
        self.carry.extend_from_slice(bytes);

        let mut samples = Vec::with_capacity(self.carry.len() / RECORD_BYTES);
        while self.carry.len() >= RECORD_BYTES {
            let mut raw = [0u8; RECORD_BYTES];
            self.carry.copy_to_slice(&mut raw);
            samples.push(decode_record(&raw));
        }

        samples
    }

    /// Number of carried bytes still waiting for the rest of their record
    pub fn pending(&self) -> usize {
        self.carry.len()
    }

    /// Drop any carried partial record
    ///
    /// Call this when the stream is (re)started: bytes held over from a
    /// previous stream would misalign every record of the new one.
    pub fn reset(&mut self) {
        self.carry.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(tick: i16, time_ms: u32) -> Vec<u8> {
        let mut raw = tick.to_le_bytes().to_vec();
        raw.extend_from_slice(&time_ms.to_le_bytes());
        raw
    }

    #[test]
    fn test_feed_whole_records() {
        let mut decoder = StreamDecoder::new();
        let mut bytes = record(256, 1000);
        bytes.extend_from_slice(&record(-256, 2000));

        let samples = decoder.feed(&bytes);

        assert_eq!(samples.len(), 2);
        assert_eq!(samples[0].position_degrees, 90.0);
        assert_eq!(samples[0].timestamp_seconds, 1.0);
        assert_eq!(samples[1].position_degrees, -90.0);
        assert_eq!(samples[1].timestamp_seconds, 2.0);
        assert_eq!(decoder.pending(), 0);
    }

    #[test]
    fn test_partial_record_is_carried() {
        let mut decoder = StreamDecoder::new();

        let samples = decoder.feed(&record(512, 3000)[..5]);

        assert!(samples.is_empty());
        assert_eq!(decoder.pending(), 5);
    }

    #[test]
    fn test_carry_completes_across_feeds() {
        let mut decoder = StreamDecoder::new();
        let mut bytes = record(256, 1000);
        bytes.extend_from_slice(&record(512, 2000));

        // 5 bytes now, the remaining 7 later
        assert!(decoder.feed(&bytes[..5]).is_empty());
        let samples = decoder.feed(&bytes[5..]);

        assert_eq!(samples.len(), 2);
        assert_eq!(samples[0].position_degrees, 90.0);
        assert_eq!(samples[1].position_degrees, 180.0);
        assert_eq!(decoder.pending(), 0);
    }

    #[test]
    fn test_ragged_tail_stays_pending() {
        let mut decoder = StreamDecoder::new();
        let mut bytes = record(0, 500);
        bytes.extend_from_slice(&record(256, 600));
        bytes.push(0xAA);

        let samples = decoder.feed(&bytes);

        assert_eq!(samples.len(), 2);
        assert_eq!(decoder.pending(), 1);
    }

    #[test]
    fn test_empty_feed_yields_nothing() {
        let mut decoder = StreamDecoder::new();
        assert!(decoder.feed(&[]).is_empty());
        assert_eq!(decoder.pending(), 0);
    }

    #[test]
    fn test_reset_drops_carry() {
        let mut decoder = StreamDecoder::new();
        decoder.feed(&[1, 2, 3]);
        assert_eq!(decoder.pending(), 3);

        decoder.reset();

        assert_eq!(decoder.pending(), 0);
        // a fresh record decodes cleanly after the reset
        let samples = decoder.feed(&record(256, 1000));
        assert_eq!(samples.len(), 1);
        assert_eq!(samples[0].position_degrees, 90.0);
    }
}
