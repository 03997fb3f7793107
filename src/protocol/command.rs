//! # Command Framing
//!
//! Every request to the rotary encoder module is a single ASCII opcode byte
//! followed by an optional little-endian payload. There is no length prefix,
//! checksum, or terminator; the opcode alone tells the peripheral how many
//! payload bytes follow.

/// Handshake request; the peripheral identifies itself with a fixed byte
pub const OP_HANDSHAKE: u8 = b'C';
/// Toggle transmission of threshold-crossing events (1-byte bool payload)
pub const OP_TOGGLE_EVENTS: u8 = b'V';
/// Toggle the continuous position stream (1-byte bool payload)
pub const OP_TOGGLE_STREAM: u8 = b'S';
/// Start logging positions to the peripheral's storage
pub const OP_START_LOGGING: u8 = b'L';
/// Stop logging positions
pub const OP_STOP_LOGGING: u8 = b'F';
/// Request the logged data captured since logging started
pub const OP_GET_LOG_DATA: u8 = b'R';
/// Request the current position (2-byte signed tick reply)
pub const OP_GET_POSITION: u8 = b'Q';
/// Re-zero the position register at the current shaft angle
pub const OP_SET_ZERO: u8 = b'Z';
/// Write the position register (2-byte signed tick payload)
pub const OP_SET_POSITION: u8 = b'P';
/// Select which programmed thresholds are armed (1-byte bitmask payload)
pub const OP_ENABLE_THRESHOLDS: u8 = b';';
/// Set the byte prefixed to event reports (1-byte payload)
pub const OP_SET_PREFIX: u8 = b'I';
/// Program the threshold table (count byte + 2-byte ticks payload)
pub const OP_SET_THRESHOLDS: u8 = b'T';
/// Set the wrap point where position folds over (2-byte unsigned tick payload)
pub const OP_SET_WRAP_POINT: u8 = b'W';

/// A request frame addressed to the rotary encoder module
///
/// Payload values are raw wire quantities (ticks, mask bytes); conversion
/// from user-facing degrees happens before a `Command` is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Confirm the peripheral at the far end speaks this protocol
    Handshake,
    /// Enable or disable threshold-crossing event transmission
    ToggleEventTransmission(bool),
    /// Enable or disable the continuous position stream
    ToggleStream(bool),
    /// Begin logging position records on the peripheral
    StartLogging,
    /// Stop logging position records
    StopLogging,
    /// Fetch the records logged so far
    GetLogData,
    /// Read the current position register
    GetPosition,
    /// Declare the current shaft angle to be zero
    SetZeroPosition,
    /// Overwrite the position register with a tick count
    SetPosition(i16),
    /// Arm the programmed thresholds selected by the MSB-first bitmask
    EnableThresholds(u8),
    /// Set the prefix byte for event reports
    SetPrefix(u8),
    /// Replace the peripheral's threshold table with these tick values
    SetThresholds(Vec<i16>),
    /// Set the tick count at which position wraps
    SetWrapPoint(u16),
}

impl Command {
    /// Get the opcode byte for this command
    pub fn opcode(&self) -> u8 {
        match self {
            Command::Handshake => OP_HANDSHAKE,
            Command::ToggleEventTransmission(_) => OP_TOGGLE_EVENTS,
            Command::ToggleStream(_) => OP_TOGGLE_STREAM,
            Command::StartLogging => OP_START_LOGGING,
            Command::StopLogging => OP_STOP_LOGGING,
            Command::GetLogData => OP_GET_LOG_DATA,
            Command::GetPosition => OP_GET_POSITION,
            Command::SetZeroPosition => OP_SET_ZERO,
            Command::SetPosition(_) => OP_SET_POSITION,
            Command::EnableThresholds(_) => OP_ENABLE_THRESHOLDS,
            Command::SetPrefix(_) => OP_SET_PREFIX,
            Command::SetThresholds(_) => OP_SET_THRESHOLDS,
            Command::SetWrapPoint(_) => OP_SET_WRAP_POINT,
        }
    }

    /// Encode this command into the byte frame sent over the transport
    ///
    /// # Returns
    ///
    /// The complete frame: opcode byte followed by the payload, if any.
    ///
    /// # Examples
    ///
    /// ```
    /// use rotary_link::protocol::command::Command;
    ///
    /// assert_eq!(Command::Handshake.encode(), vec![b'C']);
    /// assert_eq!(Command::SetPosition(256).encode(), vec![b'P', 0x00, 0x01]);
    /// ```
    pub fn encode(&self) -> Vec<u8> {
        let mut frame = vec![self.opcode()];

        match self {
            Command::ToggleEventTransmission(on) | Command::ToggleStream(on) => {
                frame.push(u8::from(*on));
            }
            Command::SetPosition(tick) => {
                frame.extend_from_slice(&tick.to_le_bytes());
            }
            Command::EnableThresholds(mask) => {
                frame.push(*mask);
            }
            Command::SetPrefix(prefix) => {
                frame.push(*prefix);
            }
            Command::SetThresholds(ticks) => {
                frame.push(ticks.len() as u8);
                for tick in ticks {
                    frame.extend_from_slice(&tick.to_le_bytes());
                }
            }
            Command::SetWrapPoint(tick) => {
                frame.extend_from_slice(&tick.to_le_bytes());
            }
            Command::Handshake
            | Command::StartLogging
            | Command::StopLogging
            | Command::GetLogData
            | Command::GetPosition
            | Command::SetZeroPosition => {}
        }

        frame
    }
}
