//! Linear gain stage.
//!
//! [`Gain`] stores a single linear factor applied multiplicatively to every
//! sample. It exposes a dB setter for parameter-facing code; the audio path
//! only ever multiplies.
//!
//! # Usage
//!
//! ```rust
//! use xtc_core::{Gain, Processor};
//!
//! let mut gain = Gain::default();
//! gain.set_gain_db(-6.0);
//! assert!((gain.process(1.0) - 0.501).abs() < 0.001);
//! ```

use crate::math::{db_to_linear, linear_to_db};
use crate::processor::Processor;

/// Multiplies every sample by a fixed linear factor.
///
/// The factor may be negative; the feedback path uses a negative factor to
/// invert polarity while attenuating.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gain {
    linear: f32,
}

impl Gain {
    /// Create a gain stage with the given linear factor.
    pub const fn new(linear: f32) -> Self {
        Self { linear }
    }

    /// Set the linear factor.
    #[inline]
    pub fn set_gain_linear(&mut self, linear: f32) {
        self.linear = linear;
    }

    /// Set the factor from decibels (positive polarity).
    #[inline]
    pub fn set_gain_db(&mut self, db: f32) {
        self.linear = db_to_linear(db);
    }

    /// Current linear factor.
    #[inline]
    pub fn gain_linear(&self) -> f32 {
        self.linear
    }

    /// Current magnitude in decibels.
    pub fn gain_db(&self) -> f32 {
        linear_to_db(self.linear.abs())
    }
}

impl Default for Gain {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl Processor for Gain {
    #[inline]
    fn process(&mut self, input: f32) -> f32 {
        input * self.linear
    }

    fn process_block_inplace(&mut self, buffer: &mut [f32]) {
        let g = self.linear;
        for sample in buffer.iter_mut() {
            *sample *= g;
        }
    }

    // Stateless.
    fn reset(&mut self) {}
}
