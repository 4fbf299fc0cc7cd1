//! Error types for coefficient design.

use thiserror::Error;

/// Errors returned by the coefficient factory.
///
/// Coefficients are only designed when the engine is prepared, so these
/// errors surface at configuration time and never from the audio path.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum CoefficientError {
    /// Sample rate is zero, negative or not finite.
    #[error("invalid sample rate: {0} Hz")]
    InvalidSampleRate(f32),

    /// Corner frequency is zero, negative or not finite.
    #[error("invalid corner frequency: {0} Hz")]
    InvalidFrequency(f32),

    /// Corner frequency is at or above the Nyquist frequency.
    #[error("corner frequency {frequency} Hz is not below Nyquist ({nyquist} Hz)")]
    AboveNyquist {
        /// Requested corner frequency in Hz.
        frequency: f32,
        /// Nyquist frequency (half the sample rate) in Hz.
        nyquist: f32,
    },
}
