//! Biquad (bi-quadratic) filter stage and coefficient factory.
//!
//! A [`Biquad`] holds its coefficients behind an [`Arc`], so one designed
//! coefficient set can be shared by every stage that plays the same role.
//! Installing a new set replaces the pointer in a single store; a stage never
//! runs with a half-written set.
//!
//! Coefficient calculation uses the RBJ Audio EQ Cookbook formulas. With
//! [`BUTTERWORTH_Q`] these equal the bilinear transform of a second-order
//! Butterworth prototype, i.e. 12 dB/octave per stage.

use alloc::sync::Arc;
use core::f32::consts::{FRAC_1_SQRT_2, PI};
use libm::{cosf, sinf};

use crate::error::CoefficientError;
use crate::processor::Processor;

/// Q factor of a maximally flat (Butterworth) second-order section.
pub const BUTTERWORTH_Q: f32 = FRAC_1_SQRT_2;

/// Normalized biquad coefficients (`a0 == 1`).
///
/// Transfer function:
/// ```text
///          b0 + b1*z^-1 + b2*z^-2
/// H(z) = --------------------------
///          1 + a1*z^-1 + a2*z^-2
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterCoefficients {
    /// Feedforward coefficient for x[n].
    pub b0: f32,
    /// Feedforward coefficient for x[n-1].
    pub b1: f32,
    /// Feedforward coefficient for x[n-2].
    pub b2: f32,
    /// Feedback coefficient for y[n-1].
    pub a1: f32,
    /// Feedback coefficient for y[n-2].
    pub a2: f32,
}

impl FilterCoefficients {
    /// Passthrough coefficients: `y[n] = x[n]`.
    pub const IDENTITY: Self = Self {
        b0: 1.0,
        b1: 0.0,
        b2: 0.0,
        a1: 0.0,
        a2: 0.0,
    };

    /// Builds a coefficient set from raw cookbook values, normalizing by `a0`.
    pub fn from_raw(b0: f32, b1: f32, b2: f32, a0: f32, a1: f32, a2: f32) -> Self {
        let a0_inv = 1.0 / a0;
        Self {
            b0: b0 * a0_inv,
            b1: b1 * a0_inv,
            b2: b2 * a0_inv,
            a1: a1 * a0_inv,
            a2: a2 * a0_inv,
        }
    }

    /// Second-order Butterworth high-pass at `frequency`.
    pub fn high_pass(sample_rate: f32, frequency: f32) -> Result<Self, CoefficientError> {
        validate(sample_rate, frequency)?;
        let (b0, b1, b2, a0, a1, a2) = highpass_coefficients(frequency, BUTTERWORTH_Q, sample_rate);
        Ok(Self::from_raw(b0, b1, b2, a0, a1, a2))
    }

    /// Second-order Butterworth low-pass at `frequency`.
    pub fn low_pass(sample_rate: f32, frequency: f32) -> Result<Self, CoefficientError> {
        validate(sample_rate, frequency)?;
        let (b0, b1, b2, a0, a1, a2) = lowpass_coefficients(frequency, BUTTERWORTH_Q, sample_rate);
        Ok(Self::from_raw(b0, b1, b2, a0, a1, a2))
    }

    /// Gain at 0 Hz, `H(1)`.
    ///
    /// Exactly 0 for high-pass sets and 1 for low-pass sets up to rounding.
    pub fn dc_gain(&self) -> f32 {
        let den = 1.0 + self.a1 + self.a2;
        if den == 0.0 {
            return 0.0;
        }
        (self.b0 + self.b1 + self.b2) / den
    }
}

impl Default for FilterCoefficients {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Designs a shared high-pass coefficient set.
///
/// Fails if `sample_rate <= 0` or `corner_frequency` is not below Nyquist.
///
/// # Example
///
/// ```rust
/// use xtc_core::{CoefficientError, make_high_pass};
///
/// assert!(make_high_pass(44100.0, 250.0).is_ok());
/// assert!(matches!(
///     make_high_pass(400.0, 250.0),
///     Err(CoefficientError::AboveNyquist { .. })
/// ));
/// ```
pub fn make_high_pass(
    sample_rate: f32,
    corner_frequency: f32,
) -> Result<Arc<FilterCoefficients>, CoefficientError> {
    FilterCoefficients::high_pass(sample_rate, corner_frequency).map(Arc::new)
}

/// Designs a shared low-pass coefficient set.
///
/// Fails if `sample_rate <= 0` or `corner_frequency` is not below Nyquist.
pub fn make_low_pass(
    sample_rate: f32,
    corner_frequency: f32,
) -> Result<Arc<FilterCoefficients>, CoefficientError> {
    FilterCoefficients::low_pass(sample_rate, corner_frequency).map(Arc::new)
}

fn validate(sample_rate: f32, frequency: f32) -> Result<(), CoefficientError> {
    if !sample_rate.is_finite() || sample_rate <= 0.0 {
        return Err(CoefficientError::InvalidSampleRate(sample_rate));
    }
    if !frequency.is_finite() || frequency <= 0.0 {
        return Err(CoefficientError::InvalidFrequency(frequency));
    }
    let nyquist = sample_rate * 0.5;
    if frequency >= nyquist {
        return Err(CoefficientError::AboveNyquist { frequency, nyquist });
    }
    Ok(())
}

/// One biquad filter stage: shared coefficients plus private history.
///
/// Implements the Direct Form I structure:
/// ```text
/// y[n] = b0*x[n] + b1*x[n-1] + b2*x[n-2]
///                - a1*y[n-1] - a2*y[n-2]
/// ```
#[derive(Debug, Clone)]
pub struct Biquad {
    coefficients: Arc<FilterCoefficients>,

    /// Input history: x[n-1], x[n-2]
    x1: f32,
    x2: f32,

    /// Output history: y[n-1], y[n-2]
    y1: f32,
    y2: f32,
}

impl Biquad {
    /// Creates a new stage with passthrough coefficients.
    pub fn new() -> Self {
        Self::with_coefficients(Arc::new(FilterCoefficients::IDENTITY))
    }

    /// Creates a new stage with the given shared coefficients and silent history.
    pub fn with_coefficients(coefficients: Arc<FilterCoefficients>) -> Self {
        Self {
            coefficients,
            x1: 0.0,
            x2: 0.0,
            y1: 0.0,
            y2: 0.0,
        }
    }

    /// Installs a new coefficient set. History is kept.
    #[inline]
    pub fn set_coefficients(&mut self, coefficients: Arc<FilterCoefficients>) {
        self.coefficients = coefficients;
    }

    /// The currently installed coefficient set.
    pub fn coefficients(&self) -> &Arc<FilterCoefficients> {
        &self.coefficients
    }

    /// Filter history as `[x1, x2, y1, y2]`.
    pub fn history(&self) -> [f32; 4] {
        [self.x1, self.x2, self.y1, self.y2]
    }

    /// Seeds the history as if the stage had been running on the signal whose
    /// last two samples were `x1` (newest) and `x2`.
    ///
    /// Output history is set to the DC response to those inputs, which is the
    /// exact steady state for a constant signal.
    pub fn seed(&mut self, x1: f32, x2: f32) {
        let dc = self.coefficients.dc_gain();
        self.x1 = x1;
        self.x2 = x2;
        self.y1 = dc * x1;
        self.y2 = dc * x2;
    }

    /// Clears the filter history.
    ///
    /// Coefficients are left untouched.
    pub fn clear(&mut self) {
        self.x1 = 0.0;
        self.x2 = 0.0;
        self.y1 = 0.0;
        self.y2 = 0.0;
    }
}

impl Default for Biquad {
    fn default() -> Self {
        Self::new()
    }
}

impl Processor for Biquad {
    #[inline]
    fn process(&mut self, input: f32) -> f32 {
        let c = &*self.coefficients;
        let output =
            c.b0 * input + c.b1 * self.x1 + c.b2 * self.x2 - c.a1 * self.y1 - c.a2 * self.y2;

        self.x2 = self.x1;
        self.x1 = input;
        self.y2 = self.y1;
        self.y1 = output;

        output
    }

    fn process_block_inplace(&mut self, buffer: &mut [f32]) {
        let c = *self.coefficients;
        let (mut x1, mut x2, mut y1, mut y2) = (self.x1, self.x2, self.y1, self.y2);

        for sample in buffer.iter_mut() {
            let input = *sample;
            let output = c.b0 * input + c.b1 * x1 + c.b2 * x2 - c.a1 * y1 - c.a2 * y2;
            x2 = x1;
            x1 = input;
            y2 = y1;
            y1 = output;
            *sample = output;
        }

        self.x1 = x1;
        self.x2 = x2;
        self.y1 = y1;
        self.y2 = y2;
    }

    fn reset(&mut self) {
        self.clear();
    }
}

/// Calculates low-pass filter coefficients using the RBJ cookbook formula.
///
/// # Arguments
///
/// * `frequency` - Cutoff frequency in Hz
/// * `q` - Q factor (0.707 for Butterworth response)
/// * `sample_rate` - Sample rate in Hz
///
/// # Returns
///
/// (b0, b1, b2, a0, a1, a2) coefficients
pub fn lowpass_coefficients(
    frequency: f32,
    q: f32,
    sample_rate: f32,
) -> (f32, f32, f32, f32, f32, f32) {
    let omega = 2.0 * PI * frequency / sample_rate;
    let cos_omega = cosf(omega);
    let sin_omega = sinf(omega);
    let alpha = sin_omega / (2.0 * q);

    let b0 = (1.0 - cos_omega) / 2.0;
    let b1 = 1.0 - cos_omega;
    let b2 = (1.0 - cos_omega) / 2.0;
    let a0 = 1.0 + alpha;
    let a1 = -2.0 * cos_omega;
    let a2 = 1.0 - alpha;

    (b0, b1, b2, a0, a1, a2)
}

/// Calculates high-pass filter coefficients using the RBJ cookbook formula.
///
/// # Arguments
///
/// * `frequency` - Cutoff frequency in Hz
/// * `q` - Q factor (0.707 for Butterworth response)
/// * `sample_rate` - Sample rate in Hz
///
/// # Returns
///
/// (b0, b1, b2, a0, a1, a2) coefficients
pub fn highpass_coefficients(
    frequency: f32,
    q: f32,
    sample_rate: f32,
) -> (f32, f32, f32, f32, f32, f32) {
    let omega = 2.0 * PI * frequency / sample_rate;
    let cos_omega = cosf(omega);
    let sin_omega = sinf(omega);
    let alpha = sin_omega / (2.0 * q);

    let b0 = (1.0 + cos_omega) / 2.0;
    let b1 = -(1.0 + cos_omega);
    let b2 = (1.0 + cos_omega) / 2.0;
    let a0 = 1.0 + alpha;
    let a1 = -2.0 * cos_omega;
    let a2 = 1.0 - alpha;

    (b0, b1, b2, a0, a1, a2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_biquad_passthrough() {
        let mut biquad = Biquad::new();

        for i in 0..10 {
            let input = i as f32 * 0.1;
            let output = biquad.process(input);
            assert!((output - input).abs() < 0.0001);
        }
    }

    #[test]
    fn test_biquad_clear() {
        let mut biquad = Biquad::with_coefficients(make_low_pass(44100.0, 1000.0).unwrap());

        for _ in 0..10 {
            biquad.process(1.0);
        }

        biquad.clear();
        assert_eq!(biquad.history(), [0.0; 4]);
    }

    #[test]
    fn test_block_matches_per_sample() {
        let coefficients = make_high_pass(48000.0, 250.0).unwrap();
        let mut a = Biquad::with_coefficients(Arc::clone(&coefficients));
        let mut b = Biquad::with_coefficients(coefficients);

        let mut block: [f32; 32] = core::array::from_fn(|i| libm::sinf(i as f32 * 0.3));
        let expected: [f32; 32] = core::array::from_fn(|i| a.process(block[i]));
        b.process_block_inplace(&mut block);

        assert_eq!(block, expected);
        assert_eq!(a.history(), b.history());
    }

    #[test]
    fn test_lowpass_dc_pass() {
        let mut biquad = Biquad::with_coefficients(make_low_pass(44100.0, 1000.0).unwrap());

        let mut output = 0.0;
        for _ in 0..1000 {
            output = biquad.process(1.0);
        }

        assert!((output - 1.0).abs() < 0.05);
    }

    #[test]
    fn test_highpass_blocks_dc() {
        let mut biquad = Biquad::with_coefficients(make_high_pass(44100.0, 250.0).unwrap());

        let mut output = 1.0;
        for _ in 0..4000 {
            output = biquad.process(1.0);
        }

        assert!(output.abs() < 1e-3, "DC should be removed, got {output}");
    }

    #[test]
    fn test_dc_gain() {
        let lp = FilterCoefficients::low_pass(44100.0, 5000.0).unwrap();
        let hp = FilterCoefficients::high_pass(44100.0, 250.0).unwrap();
        assert!((lp.dc_gain() - 1.0).abs() < 1e-4);
        assert!(hp.dc_gain().abs() < 1e-4);
        assert_eq!(FilterCoefficients::IDENTITY.dc_gain(), 1.0);
    }

    #[test]
    fn test_seed_is_steady_state_for_dc() {
        let mut biquad = Biquad::with_coefficients(make_low_pass(44100.0, 5000.0).unwrap());
        biquad.seed(0.5, 0.5);

        for _ in 0..16 {
            let out = biquad.process(0.5);
            assert!((out - 0.5).abs() < 1e-4, "seeded stage drifted: {out}");
        }
    }

    #[test]
    fn test_set_coefficients_keeps_history() {
        let mut biquad = Biquad::with_coefficients(make_low_pass(44100.0, 5000.0).unwrap());
        for _ in 0..8 {
            biquad.process(1.0);
        }
        let before = biquad.history();
        biquad.set_coefficients(make_high_pass(44100.0, 250.0).unwrap());
        assert_eq!(biquad.history(), before);
    }

    #[test]
    fn test_factory_rejects_bad_sample_rate() {
        assert_eq!(
            make_low_pass(0.0, 5000.0).unwrap_err(),
            CoefficientError::InvalidSampleRate(0.0)
        );
        assert!(matches!(
            make_high_pass(-44100.0, 250.0),
            Err(CoefficientError::InvalidSampleRate(_))
        ));
        assert!(matches!(
            make_high_pass(f32::NAN, 250.0),
            Err(CoefficientError::InvalidSampleRate(_))
        ));
    }

    #[test]
    fn test_factory_rejects_nyquist_violation() {
        let err = make_low_pass(8000.0, 5000.0).unwrap_err();
        assert_eq!(
            err,
            CoefficientError::AboveNyquist {
                frequency: 5000.0,
                nyquist: 4000.0
            }
        );
        // exactly at Nyquist is rejected too
        assert!(make_low_pass(10000.0, 5000.0).is_err());
        assert!(make_low_pass(10002.0, 5000.0).is_ok());
    }

    #[test]
    fn test_factory_rejects_bad_frequency() {
        assert!(matches!(
            make_low_pass(44100.0, 0.0),
            Err(CoefficientError::InvalidFrequency(_))
        ));
    }

    #[test]
    fn test_factory_is_deterministic() {
        let a = FilterCoefficients::high_pass(44100.0, 250.0).unwrap();
        let b = FilterCoefficients::high_pass(44100.0, 250.0).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_lowpass_coefficients_finite() {
        let (b0, b1, b2, a0, a1, a2) = lowpass_coefficients(1000.0, 0.707, 44100.0);

        assert!(b0.is_finite());
        assert!(b1.is_finite());
        assert!(b2.is_finite());
        assert!(a0.is_finite());
        assert!(a1.is_finite());
        assert!(a2.is_finite());
        assert!(a0 > 0.0);
    }
}
