//! # Rotary Link Library
//!
//! Host-side driver for a serial rotary encoder module.
//!
//! This library speaks the module's compact binary protocol: single-letter
//! commands with little-endian payloads, a continuous position/time stream,
//! on-device position logging with bulk retrieval, and programmable
//! position thresholds for event reporting.

pub mod config;
pub mod error;
pub mod units;
pub mod protocol;
pub mod transport;
pub mod device;
