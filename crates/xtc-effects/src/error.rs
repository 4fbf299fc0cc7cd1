//! Engine configuration errors.

use thiserror::Error;
use xtc_core::CoefficientError;

/// Errors returned by [`Crosstalk::prepare`](crate::Crosstalk::prepare) and
/// [`Crosstalk::set_layout`](crate::Crosstalk::set_layout).
///
/// Processing itself never fails.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum EngineError {
    /// Filter design failed for the requested sample rate.
    #[error("filter design failed: {0}")]
    Coefficients(#[from] CoefficientError),

    /// Maximum block size of zero.
    #[error("maximum block size must be at least one sample")]
    InvalidBlockSize,

    /// Bus layout other than mono or stereo with matching input and output.
    #[error("unsupported bus layout: {input} in, {output} out")]
    UnsupportedLayout {
        /// Requested input channel count.
        input: usize,
        /// Requested output channel count.
        output: usize,
    },
}
