//! # Serial Transport
//!
//! Serial port implementation of [`Transport`] for the USB-attached
//! module.

use async_trait::async_trait;
use std::fmt;
use std::io;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio_serial::{DataBits, FlowControl, Parity, SerialPort, SerialPortBuilderExt, SerialStream, StopBits};
use tracing::{debug, info};

use crate::error::Result;
use super::Transport;

/// Baud rate the module's USB serial bridge runs at
pub const BAUD_RATE: u32 = 115_200;

/// Serial port transport for the rotary encoder module
pub struct SerialTransport {
    port: SerialStream,
    path: String,
}

impl SerialTransport {
    /// Open the named serial port with the module's fixed settings
    /// (115200 baud, 8N1, no flow control)
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::RotaryLinkError::Serial`] if the port cannot
    /// be opened.
    pub fn open(path: &str) -> Result<Self> {
        let port = tokio_serial::new(path, BAUD_RATE)
            .data_bits(DataBits::Eight)
            .parity(Parity::None)
            .stop_bits(StopBits::One)
            .flow_control(FlowControl::None)
            .open_native_async()?;

        info!("Opened serial port {} at {} baud", path, BAUD_RATE);

        Ok(Self {
            port,
            path: path.to_string(),
        })
    }

    /// Path of the underlying port
    pub fn path(&self) -> &str {
        &self.path
    }
}

impl fmt::Debug for SerialTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SerialTransport")
            .field("path", &self.path)
            .field("baud_rate", &BAUD_RATE)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Transport for SerialTransport {
    async fn write_bytes(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.port.write_all(bytes).await?;
        self.port.flush().await?;
        debug!("Wrote {} bytes to {}", bytes.len(), self.path);
        Ok(())
    }

    async fn read_exact(&mut self, buf: &mut [u8]) -> io::Result<()> {
        AsyncReadExt::read_exact(&mut self.port, buf).await?;
        Ok(())
    }

    fn bytes_available(&mut self) -> io::Result<usize> {
        self.port
            .bytes_to_read()
            .map(|count| count as usize)
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e))
    }
}
