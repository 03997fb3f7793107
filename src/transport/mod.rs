//! # Transport Layer
//!
//! Byte-stream access to the peripheral. The protocol layer is pure; every
//! exchange goes through the [`Transport`] trait so the session logic can
//! be driven by a scripted mock in tests and by a serial port in
//! production.

use async_trait::async_trait;
use std::io;

pub mod serial;

pub use serial::{SerialTransport, BAUD_RATE};

/// Byte-stream transport to the rotary encoder module
///
/// The protocol has no framing, so the trait is deliberately small: write
/// a frame, read an exact reply width, and peek at how much has already
/// arrived. Errors are plain `io::Error`; the session layer decides what a
/// failure means for the connection.
#[async_trait]
pub trait Transport: Send {
    /// Write the whole buffer to the peripheral
    async fn write_bytes(&mut self, bytes: &[u8]) -> io::Result<()>;

    /// Read exactly `buf.len()` bytes, waiting until the transport
    /// delivers them or fails
    async fn read_exact(&mut self, buf: &mut [u8]) -> io::Result<()>;

    /// Number of bytes already buffered for reading; never waits
    fn bytes_available(&mut self) -> io::Result<usize>;
}


#[cfg(test)]
mod tests {
    use super::mocks::MockTransport;
    use super::*;

    #[test]
    fn test_mock_read_exact_consumes_queue() {
        tokio_test::block_on(async {
            let mut mock = MockTransport::new();
            mock.push_reply(&[1, 2, 3, 4]);

            let mut buf = [0u8; 3];
            mock.read_exact(&mut buf).await.unwrap();

            assert_eq!(buf, [1, 2, 3]);
            assert_eq!(mock.bytes_available().unwrap(), 1);
        });
    }

    #[test]
    fn test_mock_underrun_reads_nothing() {
        tokio_test::block_on(async {
            let mut mock = MockTransport::new();
            mock.push_reply(&[1, 2]);

            let mut buf = [0u8; 4];
            let error = mock.read_exact(&mut buf).await.unwrap_err();

            assert_eq!(error.kind(), io::ErrorKind::UnexpectedEof);
            // the queue is untouched; a shorter read can still succeed
            assert_eq!(mock.unread(), 2);
        });
    }

    #[test]
    fn test_mock_records_writes_per_call() {
        tokio_test::block_on(async {
            let mut mock = MockTransport::new();
            mock.write_bytes(&[b'C']).await.unwrap();
            mock.write_bytes(&[b'S', 1]).await.unwrap();

            assert_eq!(mock.writes(), vec![vec![b'C'], vec![b'S', 1]]);
        });
    }
}
