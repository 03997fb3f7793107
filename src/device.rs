//! # Device Session
//!
//! Session lifecycle and one method per peripheral capability. A session
//! starts with a handshake, tracks which mode the peripheral is in
//! (streaming, logging, or idle), and owns the transport for its whole
//! life. All wire layout lives in [`crate::protocol`]; this module decides
//! when frames are exchanged and what a transport failure means for the
//! session.

use std::io;

use tracing::{debug, info, warn};

use crate::error::{Result, RotaryLinkError};
use crate::protocol::command::Command;
use crate::protocol::log;
use crate::protocol::record::PositionSample;
use crate::protocol::response::{self, ACK_BYTES, POSITION_BYTES};
use crate::protocol::stream::StreamDecoder;
use crate::protocol::thresholds;
use crate::transport::{SerialTransport, Transport};
use crate::units;

/// Lifecycle state of a device session
///
/// Streaming and logging are modes the peripheral itself is in, so the
/// driver refuses transitions that do not match: enabling an
/// already-enabled stream would leave the host's picture of the peripheral
/// wrong on the next toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No usable link; every capability except a fresh connect is refused
    Disconnected,
    /// Handshake done, peripheral idle
    Connected,
    /// Peripheral is pushing continuous position records
    Streaming,
    /// Peripheral is logging positions to its own storage
    Logging,
}

/// A live session with a rotary encoder module
///
/// Methods that the peripheral acknowledges return `Ok(bool)`: `true` when
/// the peripheral applied the command, `false` when it declined. Errors are
/// reserved for broken transports, bad arguments, and state-machine
/// violations.
///
/// # Examples
///
/// ```no_run
/// use rotary_link::device::RotaryEncoder;
///
/// #[tokio::main]
/// async fn main() -> anyhow::Result<()> {
///     let mut encoder = RotaryEncoder::open("/dev/ttyACM0").await?;
///
///     encoder.set_zero_position().await?;
///     encoder.enable_stream().await?;
///
///     tokio::time::sleep(std::time::Duration::from_millis(50)).await;
///     for sample in encoder.poll_stream().await? {
///         println!("{:.3}s  {:.1}°", sample.timestamp_seconds, sample.position_degrees);
///     }
///
///     encoder.disable_stream().await?;
///     encoder.close();
///     Ok(())
/// }
/// ```
pub struct RotaryEncoder<T: Transport> {
    transport: T,
    state: SessionState,
    stream: StreamDecoder,
}

impl RotaryEncoder<SerialTransport> {
    /// Open the named serial port and perform the handshake
    ///
    /// # Errors
    ///
    /// Returns [`RotaryLinkError::Serial`] if the port cannot be opened and
    /// [`RotaryLinkError::HandshakeFailed`] if whatever answers is not a
    /// rotary encoder module.
    pub async fn open(path: &str) -> Result<Self> {
        let transport = SerialTransport::open(path)?;
        Self::connect(transport).await
    }
}

impl<T: Transport> RotaryEncoder<T> {
    /// Perform the handshake over an already-open transport
    pub async fn connect(mut transport: T) -> Result<Self> {
        transport.write_bytes(&Command::Handshake.encode()).await?;

        let mut reply = [0u8; ACK_BYTES];
        transport.read_exact(&mut reply).await?;
        response::decode_handshake(reply[0])?;

        info!("Rotary encoder module handshake complete");

        Ok(Self {
            transport,
            state: SessionState::Connected,
            stream: StreamDecoder::new(),
        })
    }

    /// Current session state
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// End the session and release the transport
    ///
    /// The peripheral keeps whatever mode it was left in; a caller that
    /// wants a quiet port should disable streaming first.
    pub fn close(self) {
        info!("Closing rotary encoder session");
    }

    /// Ask the peripheral to report threshold-crossing events
    pub async fn enable_event_transmission(&mut self) -> Result<bool> {
        self.require_session()?;
        self.send(Command::ToggleEventTransmission(true)).await?;
        self.read_ack().await
    }

    /// Stop the peripheral reporting threshold-crossing events
    pub async fn disable_event_transmission(&mut self) -> Result<bool> {
        self.require_session()?;
        self.send(Command::ToggleEventTransmission(false)).await?;
        self.read_ack().await
    }

    /// Start the continuous position stream
    ///
    /// # Errors
    ///
    /// Returns [`RotaryLinkError::InvalidSessionState`] unless the session
    /// is `Connected` and idle.
    pub async fn enable_stream(&mut self) -> Result<()> {
        self.require_state(SessionState::Connected)?;
        self.send(Command::ToggleStream(true)).await?;

        // bytes held over from an earlier stream would misalign this one
        self.stream.reset();
        self.state = SessionState::Streaming;
        info!("Position streaming enabled");
        Ok(())
    }

    /// Stop the continuous position stream
    pub async fn disable_stream(&mut self) -> Result<()> {
        self.require_state(SessionState::Streaming)?;
        self.send(Command::ToggleStream(false)).await?;

        self.state = SessionState::Connected;
        info!("Position streaming disabled");
        Ok(())
    }

    /// Drain whatever stream bytes have arrived and decode the completed
    /// records, oldest first
    ///
    /// Returns an empty vector when nothing (or only a partial record) has
    /// arrived; partial tails are carried into the next poll. This never
    /// waits for data.
    pub async fn poll_stream(&mut self) -> Result<Vec<PositionSample>> {
        self.require_session()?;

        let available = self.transport.bytes_available()?;
        if available == 0 {
            return Ok(Vec::new());
        }

        let mut buf = vec![0u8; available];
        self.read_reply(&mut buf).await?;
        Ok(self.stream.feed(&buf))
    }

    /// Start logging positions to the peripheral's storage
    pub async fn start_logging(&mut self) -> Result<()> {
        self.require_state(SessionState::Connected)?;
        self.send(Command::StartLogging).await?;

        self.state = SessionState::Logging;
        info!("Position logging started");
        Ok(())
    }

    /// Stop logging positions
    pub async fn stop_logging(&mut self) -> Result<()> {
        self.require_state(SessionState::Logging)?;
        self.send(Command::StopLogging).await?;

        self.state = SessionState::Connected;
        info!("Position logging stopped");
        Ok(())
    }

    /// Download the records logged since logging started
    ///
    /// # Errors
    ///
    /// Returns [`RotaryLinkError::TruncatedLog`] when the transport cannot
    /// supply the byte count the peripheral declared, or when that count is
    /// not a whole number of records. A truncated supply also marks the
    /// session `Disconnected`: the unread remainder would poison every
    /// later exchange.
    pub async fn logged_data(&mut self) -> Result<Vec<PositionSample>> {
        self.require_session()?;
        self.send(Command::GetLogData).await?;

        let mut header = [0u8; log::COUNT_BYTES];
        self.read_reply(&mut header).await?;
        let declared = log::decode_declared_bytes(&header);
        debug!("Log transfer: {} declared bytes", declared);

        let mut body = vec![0u8; declared];
        if let Err(error) = self.transport.read_exact(&mut body).await {
            self.state = SessionState::Disconnected;
            warn!("Log transfer failed mid-body; session disconnected: {error}");
            return Err(if error.kind() == io::ErrorKind::UnexpectedEof {
                RotaryLinkError::TruncatedLog {
                    expected: declared,
                    received: 0,
                }
            } else {
                error.into()
            });
        }

        log::decode_batch(&body)
    }

    /// Read the current position in degrees
    pub async fn current_position(&mut self) -> Result<f64> {
        self.require_session()?;
        self.send(Command::GetPosition).await?;

        let mut reply = [0u8; POSITION_BYTES];
        self.read_reply(&mut reply).await?;
        Ok(response::decode_position(&reply))
    }

    /// Declare the current shaft angle to be zero
    pub async fn set_zero_position(&mut self) -> Result<()> {
        self.require_session()?;
        self.send(Command::SetZeroPosition).await
    }

    /// Overwrite the position register
    ///
    /// # Errors
    ///
    /// Returns [`RotaryLinkError::InvalidArgument`] before anything is sent
    /// if `degrees` cannot be expressed as a 16-bit tick count.
    pub async fn set_position(&mut self, degrees: f64) -> Result<bool> {
        self.require_session()?;
        let tick = units::degrees_to_ticks(degrees)?;

        self.send(Command::SetPosition(tick)).await?;
        self.read_ack().await
    }

    /// Replace the peripheral's threshold table
    ///
    /// The peripheral stores at most
    /// [`MAX_THRESHOLDS`](crate::protocol::thresholds::MAX_THRESHOLDS)
    /// entries; larger tables are sent anyway (the wire format allows
    /// them) and the peripheral's ack reports what it thought of that.
    pub async fn set_thresholds(&mut self, degrees: &[f64]) -> Result<bool> {
        self.require_session()?;

        if degrees.len() > thresholds::MAX_THRESHOLDS {
            warn!(
                "{} thresholds requested; the peripheral stores at most {}",
                degrees.len(),
                thresholds::MAX_THRESHOLDS
            );
        }

        let frame = thresholds::encode_thresholds(degrees)?;
        self.transport.write_bytes(&frame).await?;
        debug!("Sent threshold table with {} entries", degrees.len());
        self.read_ack().await
    }

    /// Select which programmed thresholds are armed
    ///
    /// # Errors
    ///
    /// Returns [`RotaryLinkError::InvalidArgument`] unless exactly eight
    /// flags are given, one per table slot.
    pub async fn enable_thresholds(&mut self, flags: &[bool]) -> Result<()> {
        self.require_session()?;
        let mask = thresholds::pack_enable_mask(flags)?;
        self.send(Command::EnableThresholds(mask)).await
    }

    /// Set the byte the peripheral prefixes to event reports
    pub async fn set_prefix(&mut self, prefix: u8) -> Result<bool> {
        self.require_session()?;
        self.send(Command::SetPrefix(prefix)).await?;
        self.read_ack().await
    }

    /// Set the angle at which reported positions wrap
    ///
    /// # Errors
    ///
    /// Returns [`RotaryLinkError::InvalidArgument`] for angles that do not
    /// map to an unsigned 16-bit tick count; the wrap register cannot hold
    /// a negative angle.
    pub async fn set_wrap_point(&mut self, degrees: f64) -> Result<bool> {
        self.require_session()?;

        let tick = units::degrees_to_ticks(degrees)?;
        let tick = u16::try_from(tick).map_err(|_| {
            RotaryLinkError::InvalidArgument(format!(
                "wrap point {degrees} degrees maps to a negative tick count"
            ))
        })?;

        self.send(Command::SetWrapPoint(tick)).await?;
        self.read_ack().await
    }

    fn require_session(&self) -> Result<()> {
        if self.state == SessionState::Disconnected {
            return Err(RotaryLinkError::NotConnected);
        }
        Ok(())
    }

    fn require_state(&self, expected: SessionState) -> Result<()> {
        self.require_session()?;
        if self.state != expected {
            return Err(RotaryLinkError::InvalidSessionState(self.state));
        }
        Ok(())
    }

    async fn send(&mut self, command: Command) -> Result<()> {
        let frame = command.encode();
        self.transport.write_bytes(&frame).await?;
        debug!("Sent {:?} ({} bytes)", command, frame.len());
        Ok(())
    }

    /// Blocking read of a fixed-width reply. A failure here leaves the
    /// exchange half-done, so the session is marked `Disconnected`.
    async fn read_reply(&mut self, buf: &mut [u8]) -> Result<()> {
        if let Err(error) = self.transport.read_exact(buf).await {
            self.state = SessionState::Disconnected;
            warn!("Transport failed mid-reply; session disconnected: {error}");
            return Err(error.into());
        }
        Ok(())
    }

    async fn read_ack(&mut self) -> Result<bool> {
        let mut reply = [0u8; ACK_BYTES];
        self.read_reply(&mut reply).await?;
        Ok(response::decode_ack(reply[0]))
    }
}
