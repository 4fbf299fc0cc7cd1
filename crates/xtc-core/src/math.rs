//! Mathematical utility functions for DSP.
//!
//! All functions are allocation-free and suitable for `no_std`.
//!
//! # Level Conversions
//!
//! - [`db_to_linear`] / [`linear_to_db`] - Convert between dB and linear gain
//!
//! # Time Conversions
//!
//! - [`ms_to_samples`]
//!
//! # Numerics
//!
//! - [`flush_denormal`] - Zero out values headed into the subnormal range

use libm::{expf, logf};

/// Convert decibels to linear gain.
///
/// # Example
/// ```rust
/// use xtc_core::db_to_linear;
///
/// assert!((db_to_linear(0.0) - 1.0).abs() < 0.001);
/// assert!((db_to_linear(-6.02) - 0.5).abs() < 0.01);
/// ```
#[inline]
pub fn db_to_linear(db: f32) -> f32 {
    // 10^(dB/20) = e^(dB * ln(10)/20)
    const FACTOR: f32 = core::f32::consts::LN_10 / 20.0;
    expf(db * FACTOR)
}

/// Convert linear gain to decibels.
///
/// Inputs at or below `1e-10` are treated as `1e-10` (-200 dB).
///
/// # Example
/// ```rust
/// use xtc_core::linear_to_db;
///
/// assert!((linear_to_db(1.0) - 0.0).abs() < 0.001);
/// assert!((linear_to_db(0.5) - (-6.02)).abs() < 0.01);
/// ```
#[inline]
pub fn linear_to_db(linear: f32) -> f32 {
    // 20 * log10(linear) = 20 * ln(linear) / ln(10)
    const FACTOR: f32 = 20.0 / core::f32::consts::LN_10;
    logf(linear.max(1e-10)) * FACTOR
}

/// Convert milliseconds to samples.
///
/// The result is fractional; the delay line interpolates between samples.
#[inline]
pub fn ms_to_samples(ms: f32, sample_rate: f32) -> f32 {
    ms * sample_rate / 1000.0
}

/// Flush subnormal (denormalized) floats to zero.
///
/// Replaces values below 1e-20 with zero, leaving margin before the
/// IEEE 754 subnormal range begins. The feedback path applies this to the
/// band signal after its attenuating passes.
#[allow(clippy::inline_always)]
#[inline(always)]
pub fn flush_denormal(x: f32) -> f32 {
    if x.abs() < 1e-20 { 0.0 } else { x }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_db_linear_roundtrip() {
        let original = 0.5;
        let db = linear_to_db(original);
        let back = db_to_linear(db);
        assert!(
            (original - back).abs() < 1e-5,
            "Roundtrip failed: {} -> {} -> {}",
            original,
            db,
            back
        );
    }

    #[test]
    fn test_db_known_values() {
        assert!((db_to_linear(0.0) - 1.0).abs() < 1e-6);
        assert!((db_to_linear(-6.0206) - 0.5).abs() < 0.001);
        assert!((db_to_linear(-3.0) - 0.707_946).abs() < 1e-5);
        assert!((db_to_linear(-2.0) - 0.794_328).abs() < 1e-5);
        assert!((db_to_linear(-4.0) - 0.630_957).abs() < 1e-5);
    }

    #[test]
    fn test_linear_to_db_floor() {
        assert!((linear_to_db(0.0) - (-200.0)).abs() < 0.01);
    }

    #[test]
    fn test_ms_samples_conversion() {
        assert_eq!(ms_to_samples(10.0, 48000.0), 480.0);

        // Feedback delays are a fraction of a sample at common rates.
        let d = ms_to_samples(0.06, 44100.0);
        assert!((d - 2.646).abs() < 1e-4, "got {d}");
    }

    #[test]
    fn test_flush_denormal() {
        assert_eq!(flush_denormal(1.0), 1.0);
        assert_eq!(flush_denormal(-0.5), -0.5);
        assert_eq!(flush_denormal(1e-10), 1e-10);

        assert_eq!(flush_denormal(1e-21), 0.0);
        assert_eq!(flush_denormal(-1e-21), 0.0);
        assert_eq!(flush_denormal(1e-38), 0.0);
        assert_eq!(flush_denormal(0.0), 0.0);
    }
}
