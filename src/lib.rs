//! Circle March - interactive 2D ray marching over a signed distance field
//!
//! Core modules:
//! - `sim`: Deterministic simulation (geometry, obstacle field, hero, ray marcher, tick)
//! - `renderer`: Drawing surface abstraction and WebGPU pipeline
//! - `platform`: Frame clock and keyboard state glue
//! - `settings`: Data-driven tuning and layout selection

pub mod error;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use error::{Error, Result};
pub use settings::Settings;

/// Reference tuning constants
pub mod consts {
    /// Distance the hero travels per tick while a movement key is held
    pub const MOVE_STEP: f64 = 5.0;
    /// Degrees turned per tick while a rotate key is held
    pub const TURN_STEP_DEGREES: f64 = 1.0;
    /// Facing angle at spawn
    pub const START_ANGLE_DEGREES: f64 = 140.0;

    /// March loop continues while clearance is above this
    pub const MARCH_EPSILON: f64 = 0.0001;
    /// Final clearance below this counts as a hit (looser than the loop epsilon)
    pub const HIT_THRESHOLD: f64 = 0.1;
    /// Hard cap on march iterations for near-tangent rays
    pub const MAX_MARCH_STEPS: usize = 2048;

    /// Default viewport used by headless runs
    pub const DEFAULT_VIEWPORT: (f64, f64) = (1280.0, 960.0);
}

/// Convert degrees to radians
#[inline]
pub fn degrees_to_radians(degrees: f64) -> f64 {
    degrees * std::f64::consts::PI / 180.0
}

/// Clamp `value` into `[lo, hi]` inclusive.
///
/// Inverted or NaN bounds are rejected rather than swapped. A NaN `value`
/// is `InvalidState`.
pub fn clamp_to_range(value: f64, lo: f64, hi: f64) -> Result<f64> {
    if lo.is_nan() || hi.is_nan() || lo > hi {
        return Err(Error::InvalidBounds { lo, hi });
    }
    if value.is_nan() {
        return Err(Error::InvalidState("cannot clamp NaN".into()));
    }
    Ok(value.max(lo).min(hi))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_degrees_to_radians() {
        assert!((degrees_to_radians(180.0) - std::f64::consts::PI).abs() < 1e-12);
        assert!((degrees_to_radians(90.0) - std::f64::consts::FRAC_PI_2).abs() < 1e-12);
        assert_eq!(degrees_to_radians(0.0), 0.0);
    }

    #[test]
    fn test_clamp_to_range() {
        assert_eq!(clamp_to_range(-3.0, 0.0, 10.0).unwrap(), 0.0);
        assert_eq!(clamp_to_range(12.0, 0.0, 10.0).unwrap(), 10.0);
        assert_eq!(clamp_to_range(4.5, 0.0, 10.0).unwrap(), 4.5);
        // Inclusive at both ends
        assert_eq!(clamp_to_range(10.0, 0.0, 10.0).unwrap(), 10.0);
        assert_eq!(clamp_to_range(7.0, 5.0, 5.0).unwrap(), 5.0);
    }

    #[test]
    fn test_clamp_rejects_nan_value() {
        assert!(matches!(
            clamp_to_range(f64::NAN, 0.0, 10.0),
            Err(Error::InvalidState(_))
        ));
        assert_eq!(clamp_to_range(f64::INFINITY, 0.0, 10.0).unwrap(), 10.0);
    }

    #[test]
    fn test_clamp_rejects_inverted_bounds() {
        let err = clamp_to_range(1.0, 10.0, 0.0).unwrap_err();
        assert!(matches!(err, Error::InvalidBounds { lo, hi } if lo == 10.0 && hi == 0.0));
        assert!(clamp_to_range(1.0, f64::NAN, 0.0).is_err());
    }
}
