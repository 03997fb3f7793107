//! # Rotary Link
//!
//! Live position readout for a serial rotary encoder module.
//!
//! This application connects to the module, programs the configured
//! threshold table, and streams position samples to the log until
//! interrupted.

use anyhow::Result;
use std::path::Path;
use tokio::time::{interval, Duration};
use tracing::{error, info, warn};
use tracing_subscriber;

mod config;
mod error;
mod units;
mod protocol;
mod transport;
mod device;

use config::Config;
use device::{RotaryEncoder, SessionState};

/// Configuration file consulted when no path is given on the command line
const DEFAULT_CONFIG_PATH: &str = "rotary-link.toml";

/// Main entry point for the Rotary Link readout tool
///
/// Connects to the rotary encoder module and logs live position samples
/// until interrupted.
///
/// # Control Flow
///
/// 1. **Initialization**
///    - Set up logging with tracing subscriber
///    - Load the TOML configuration (first CLI argument, falling back to
///      `rotary-link.toml`, falling back to built-in defaults)
///    - Open the serial port and handshake with the module
///
/// 2. **Setup**
///    - Program and arm the configured threshold table, if any
///    - Enable the continuous position stream
///
/// 3. **Main Loop**
///    - Drain the stream at the configured poll interval and log every
///      completed sample
///    - Handle Ctrl+C for graceful shutdown
///
/// 4. **Graceful Shutdown**
///    - Disable the stream and read back the final position
///    - Log the total sample count
///    - Clean exit
///
/// # Errors
///
/// Returns error if:
/// - The configuration file is present but unreadable or invalid
/// - The serial port cannot be opened, or the handshake fails
/// - A setup command cannot be delivered to the peripheral
///
/// # Examples
///
/// Run the tool:
/// ```bash
/// cargo run --release -- rotary-link.toml
/// ```
///
/// Expected output:
/// ```text
/// INFO rotary_link: Rotary Link v0.1.0 starting...
/// INFO rotary_link::transport::serial: Opened serial port /dev/ttyACM0 at 115200 baud
/// INFO rotary_link::device: Rotary encoder module handshake complete
/// INFO rotary_link: Streaming position samples; press Ctrl+C to exit
/// INFO rotary_link: t=  12.408s  position=   90.0°
/// ```
#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into())
        )
        .init();

    info!("Rotary Link v{} starting...", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());
    let config = if Path::new(&config_path).exists() {
        info!("Loading configuration from {config_path}");
        Config::load(&config_path)?
    } else {
        info!("No configuration file at {config_path}; using defaults");
        Config::default()
    };

    // Connect and handshake
    let mut encoder = RotaryEncoder::open(&config.serial.port).await?;

    // Program the startup threshold table, if one is configured
    if !config.thresholds.degrees.is_empty() {
        if encoder.set_thresholds(&config.thresholds.degrees).await? {
            info!(
                "Programmed {} position thresholds",
                config.thresholds.degrees.len()
            );
            if config.thresholds.enabled.iter().any(|&armed| armed) {
                encoder.enable_thresholds(&config.thresholds.enabled).await?;
            }
        } else {
            warn!("Peripheral declined the configured threshold table");
        }
    }

    encoder.enable_stream().await?;
    info!("Streaming position samples; press Ctrl+C to exit");

    let mut poll_interval = interval(Duration::from_millis(config.stream.poll_interval_ms));
    let mut sample_count: u64 = 0;

    // Main readout loop
    loop {
        tokio::select! {
            // Drain the stream at the configured cadence
            _ = poll_interval.tick() => {
                match encoder.poll_stream().await {
                    Ok(samples) => {
                        for sample in &samples {
                            info!(
                                "t={:8.3}s  position={:7.1}°",
                                sample.timestamp_seconds, sample.position_degrees
                            );
                        }
                        sample_count += samples.len() as u64;
                    }
                    Err(e) => {
                        error!("Stream poll failed: {e}");
                        break;
                    }
                }
            }

            // Handle Ctrl+C for graceful shutdown
            _ = tokio::signal::ctrl_c() => {
                info!("Received Ctrl+C, shutting down...");
                break;
            }
        }
    }

    // Quiet the port and report where the shaft ended up
    if encoder.state() == SessionState::Streaming {
        encoder.disable_stream().await?;
        let position = encoder.current_position().await?;
        info!("Final position: {position}°");
    }
    info!("Total samples received: {sample_count}");
    encoder.close();

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_path() {
        assert!(DEFAULT_CONFIG_PATH.ends_with(".toml"));
    }

    #[test]
    fn test_default_config_is_usable() {
        // a missing config file must never stop the tool from starting
        let config = Config::default();
        assert!(!config.serial.port.is_empty());
        assert!(config.stream.poll_interval_ms > 0);
        assert_eq!(config.thresholds.enabled.len(), 8);
    }
}
