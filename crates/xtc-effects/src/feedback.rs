//! Cross-channel feedback path.
//!
//! Each channel owns a gain stage followed by a delay line. Once per block the
//! band-limited buffers are run through them [`FEEDBACK_PASSES`] times, with
//! each channel's stage applied to the *other* channel's buffer:
//!
//! ```text
//! repeat FEEDBACK_PASSES:
//!     right <- delay_L(gain_L * right)
//!     left  <- delay_R(gain_R * left)
//! ```
//!
//! Buffers are modified in place, so every pass reads the previous pass's
//! output. The delay lines see one continuous stream of samples across all
//! passes and all blocks.
//!
//! The gain is the negated linear equivalent of the attenuation in dB. With
//! attenuation always below 0 dB every pass scales by less than one, and the
//! linearly interpolated delay is a convex combination of past inputs, so the
//! loop cannot grow the signal.

use xtc_core::{
    Chain, DelayLine, Gain, Processor, ProcessorExt, db_to_linear, flush_denormal, ms_to_samples,
};

/// Number of cross-channel passes per block.
pub const FEEDBACK_PASSES: usize = 40;

/// Gain then delay, for one channel.
pub type FeedbackStage = Chain<Gain, DelayLine>;

/// The pair of per-channel gain/delay stages and the cross-coupled loop.
#[derive(Debug, Clone)]
pub struct FeedbackPath {
    left: FeedbackStage,
    right: FeedbackStage,
}

impl FeedbackPath {
    /// Creates a feedback path with unity gain and no delay capacity.
    ///
    /// Call [`allocate`](Self::allocate) before configuring a delay.
    pub fn new() -> Self {
        Self {
            left: Self::stage(0),
            right: Self::stage(0),
        }
    }

    fn stage(max_delay_samples: usize) -> FeedbackStage {
        Gain::default().chain(DelayLine::new(max_delay_samples))
    }

    /// Replaces both delay lines with silent ones able to hold
    /// `max_delay_samples`. Allocates; call from `prepare` only.
    pub fn allocate(&mut self, max_delay_samples: usize) {
        *self.left.second_mut() = DelayLine::new(max_delay_samples);
        *self.right.second_mut() = DelayLine::new(max_delay_samples);
    }

    /// Sets both stages from the current settings.
    ///
    /// Gain becomes `-db_to_linear(attenuation_db)`; delay becomes
    /// `delay_ms` converted to samples at `sample_rate`, clamped to the
    /// allocated capacity.
    pub fn configure(&mut self, attenuation_db: f32, delay_ms: f32, sample_rate: f32) {
        let gain = -db_to_linear(attenuation_db);
        let delay = ms_to_samples(delay_ms, sample_rate);
        for stage in [&mut self.left, &mut self.right] {
            stage.first_mut().set_gain_linear(gain);
            stage.second_mut().set_delay(delay);
        }
    }

    /// Runs the cross-coupled loop over the band-limited buffers in place.
    pub fn process(&mut self, left: &mut [f32], right: &mut [f32]) {
        for _ in 0..FEEDBACK_PASSES {
            self.left.process_block_inplace(right);
            self.right.process_block_inplace(left);
        }
        for sample in left.iter_mut().chain(right.iter_mut()) {
            *sample = flush_denormal(*sample);
        }
    }

    /// Current linear gain (negative).
    pub fn gain(&self) -> f32 {
        self.left.first().gain_linear()
    }

    /// Current delay in samples.
    pub fn delay_samples(&self) -> f32 {
        self.left.second().delay()
    }

    /// Left channel's stage.
    pub fn left(&self) -> &FeedbackStage {
        &self.left
    }

    /// Right channel's stage.
    pub fn right(&self) -> &FeedbackStage {
        &self.right
    }

    /// Clears both delay lines. Gain and delay settings are kept.
    pub fn reset(&mut self) {
        self.left.reset();
        self.right.reset();
    }
}

impl Default for FeedbackPath {
    fn default() -> Self {
        Self::new()
    }
}
