//! # Unit Conversion
//!
//! Conversion between the peripheral's native tick counts and angular
//! degrees.
//!
//! The encoder resolves 512 ticks per half-rotation (180°). Degrees are
//! reported rounded to one decimal, so tick → degrees → tick is an
//! approximate round-trip: the last decimal digit can move the result by
//! one tick. That is a documented property of the wire unit, not a bug.

use crate::error::{Result, RotaryLinkError};

/// Encoder resolution: ticks per half-rotation
pub const TICKS_PER_HALF_TURN: f64 = 512.0;

/// Angular span of a half-rotation in degrees
pub const DEGREES_PER_HALF_TURN: f64 = 180.0;

/// Convert a native tick count to degrees, rounded to one decimal place
///
/// # Examples
///
/// ```
/// use rotary_link::units::ticks_to_degrees;
///
/// assert_eq!(ticks_to_degrees(0), 0.0);
/// assert_eq!(ticks_to_degrees(256), 90.0);
/// assert_eq!(ticks_to_degrees(-512), -180.0);
/// ```
pub fn ticks_to_degrees(tick: i16) -> f64 {
    ((tick as f64 / TICKS_PER_HALF_TURN) * DEGREES_PER_HALF_TURN * 10.0).round() / 10.0
}

/// Convert degrees to the nearest native tick count
///
/// # Errors
///
/// Returns [`RotaryLinkError::InvalidArgument`] if the input is not finite
/// or the rounded tick count does not fit a signed 16-bit value. The wire
/// format carries positions as `i16`, so silently truncating here would
/// send the peripheral a wildly wrong position.
///
/// # Examples
///
/// ```
/// use rotary_link::units::degrees_to_ticks;
///
/// assert_eq!(degrees_to_ticks(90.0).unwrap(), 256);
/// assert_eq!(degrees_to_ticks(-180.0).unwrap(), -512);
/// assert!(degrees_to_ticks(1.0e6).is_err());
/// ```
pub fn degrees_to_ticks(degrees: f64) -> Result<i16> {
    if !degrees.is_finite() {
        return Err(RotaryLinkError::InvalidArgument(format!(
            "position {degrees} degrees is not a finite value"
        )));
    }

    let ticks = (degrees / DEGREES_PER_HALF_TURN * TICKS_PER_HALF_TURN).round();

    if ticks < f64::from(i16::MIN) || ticks > f64::from(i16::MAX) {
        return Err(RotaryLinkError::InvalidArgument(format!(
            "position {degrees} degrees is outside the 16-bit tick range"
        )));
    }

    Ok(ticks as i16)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_tick_values() {
        assert_eq!(ticks_to_degrees(0), 0.0);
        assert_eq!(ticks_to_degrees(256), 90.0);
        assert_eq!(ticks_to_degrees(512), 180.0);
        assert_eq!(ticks_to_degrees(-256), -90.0);
        assert_eq!(ticks_to_degrees(-512), -180.0);
    }

    #[test]
    fn test_known_degree_values() {
        assert_eq!(degrees_to_ticks(0.0).unwrap(), 0);
        assert_eq!(degrees_to_ticks(90.0).unwrap(), 256);
        assert_eq!(degrees_to_ticks(180.0).unwrap(), 512);
        assert_eq!(degrees_to_ticks(-90.0).unwrap(), -256);
        assert_eq!(degrees_to_ticks(179.0).unwrap(), 509);
    }

    #[test]
    fn test_one_decimal_rounding() {
        // 1 tick = 0.3515625° exactly; the wire unit keeps one decimal
        assert_eq!(ticks_to_degrees(1), 0.4);
        assert_eq!(ticks_to_degrees(3), 1.1);
        assert_eq!(ticks_to_degrees(10), 3.5);
        assert_eq!(ticks_to_degrees(-1), -0.4);
    }

    #[test]
    fn test_round_trip_within_one_tick() {
        // Exact equality is not guaranteed: the one-decimal rounding of the
        // degree representation may move the reconstructed tick by one
        for tick in i16::MIN..=i16::MAX {
            let back = degrees_to_ticks(ticks_to_degrees(tick)).unwrap();
            assert!(
                (i32::from(back) - i32::from(tick)).abs() <= 1,
                "tick {} round-tripped to {}",
                tick,
                back
            );
        }
    }

    #[test]
    fn test_out_of_range_degrees_rejected() {
        // i16::MAX ticks is ~11519.8°; anything past that cannot be encoded
        assert!(degrees_to_ticks(11519.8).is_ok());
        assert!(degrees_to_ticks(11521.0).is_err());
        assert!(degrees_to_ticks(-11521.0).is_err());
        assert!(degrees_to_ticks(1.0e9).is_err());
    }

    #[test]
    fn test_non_finite_degrees_rejected() {
        assert!(degrees_to_ticks(f64::NAN).is_err());
        assert!(degrees_to_ticks(f64::INFINITY).is_err());
        assert!(degrees_to_ticks(f64::NEG_INFINITY).is_err());
    }
}
