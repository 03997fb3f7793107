//! # Error Types
//!
//! Custom error types for Rotary Link using `thiserror`.
//!
//! Peripheral-reported soft failures (rejected threshold set, refused
//! position write) are NOT errors: acknowledged operations return
//! `Ok(bool)` and the caller decides whether a `false` ack is fatal.

use thiserror::Error;

use crate::device::SessionState;
use crate::protocol::response::HANDSHAKE_ACK;

/// Main error type for Rotary Link
#[derive(Debug, Error)]
pub enum RotaryLinkError {
    /// Handshake reply was not the expected magic byte; the session never
    /// reaches `Connected`
    #[error("handshake failed: peripheral replied {0}, expected {HANDSHAKE_ACK}")]
    HandshakeFailed(u8),

    /// Transport-level failure: short read, write failure, or a port torn
    /// down mid-exchange. Never retried by the driver; a failure during a
    /// blocking read also marks the session `Disconnected`
    #[error("transport error: {0}")]
    Transport(#[from] std::io::Error),

    /// Serial port could not be opened
    #[error("serial port error: {0}")]
    Serial(#[from] tokio_serial::Error),

    /// Malformed input to an encode operation; raised before any bytes are
    /// written to the transport
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Log download ended short of a whole-record boundary. `received`
    /// counts the record bytes that did arrive intact; it is 0 when the
    /// transport failed before delivering the declared byte count
    #[error("log transfer truncated: expected {expected} bytes, received {received}")]
    TruncatedLog { expected: usize, received: usize },

    /// Capability invoked on a session that is `Disconnected`
    #[error("session is not connected; a fresh handshake is required")]
    NotConnected,

    /// Session state machine precondition violated (e.g. `disable_stream`
    /// while not streaming)
    #[error("command rejected in session state {0:?}")]
    InvalidSessionState(SessionState),

    /// Configuration errors
    #[error("configuration error: {0}")]
    Config(#[from] toml::de::Error),
}

/// Result type alias for Rotary Link
pub type Result<T> = std::result::Result<T, RotaryLinkError>;
