//! # Encoder Protocol Module
//!
//! Implementation of the rotary encoder module's serial command protocol.
//!
//! This module handles:
//! - Command framing (single-letter opcode + little-endian payload)
//! - Synchronous response decoding (acks, handshake, position queries)
//! - The continuous position/time stream pushed by the peripheral
//! - Bulk decoding of the peripheral's SD-backed log
//! - Threshold-table and enable-mask encodings
//!
//! All byte layout here is little-endian. Encoding and decoding are pure;
//! the transport exchange lives in [`crate::device`].

pub mod command;
pub mod log;
pub mod record;
pub mod response;
pub mod stream;
pub mod thresholds;
