//! Delay line implementations for the feedback path.
//!
//! # Types
//!
//! - [`InterpolatedDelay`] - Heap-allocated circular buffer with linearly
//!   interpolated fractional reads
//! - [`DelayLine`] - [`Processor`] that writes each input and reads it back a
//!   configured (possibly fractional) number of samples later
//!
//! Reads always interpolate linearly. The crosstalk feedback loop runs every
//! block through the same delay forty times, so a single fixed read policy
//! keeps the result reproducible.

use alloc::vec;
use alloc::vec::Vec;

use crate::processor::Processor;

/// Interpolated delay line using a circular buffer (heap-allocated).
///
/// # Memory
///
/// The buffer is allocated during construction and never reallocates.
/// No allocations occur during audio processing.
///
/// # Example
///
/// ```rust
/// use xtc_core::InterpolatedDelay;
///
/// let mut delay = InterpolatedDelay::new(16);
/// delay.write(1.0);
/// delay.write(0.0);
/// assert_eq!(delay.read(1.0), 1.0);
/// assert_eq!(delay.read(0.5), 0.5);
/// ```
#[derive(Debug, Clone)]
pub struct InterpolatedDelay {
    /// Circular buffer storage
    buffer: Vec<f32>,
    /// Write position in buffer
    write_pos: usize,
}

impl InterpolatedDelay {
    /// Creates a new delay line with the given capacity in samples.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is 0.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "Delay size must be > 0");

        Self {
            buffer: vec![0.0; capacity],
            write_pos: 0,
        }
    }

    /// Reads a delayed sample, interpolating linearly between the two
    /// nearest whole-sample delays.
    ///
    /// `delay_samples == 0.0` returns the most recently written sample.
    /// Delays beyond the capacity are clamped.
    #[inline]
    pub fn read(&self, delay_samples: f32) -> f32 {
        debug_assert!(delay_samples >= 0.0);

        let len = self.buffer.len();
        let delay_clamped = delay_samples.min((len - 1) as f32);

        let delay_int = delay_clamped as usize;
        let frac = delay_clamped - delay_int as f32;

        // read_pos points to the sample `delay_int` samples before the last written.
        let read_pos = (self.write_pos + len - delay_int - 1) % len;

        let next_pos = (read_pos + len - 1) % len;
        let a = self.buffer[read_pos];
        let b = self.buffer[next_pos];
        a + (b - a) * frac
    }

    /// Writes a sample to the delay line and advances the write position.
    #[inline]
    pub fn write(&mut self, sample: f32) {
        self.buffer[self.write_pos] = sample;
        self.write_pos = (self.write_pos + 1) % self.buffer.len();
    }

    /// Clears the delay line (sets all samples to 0).
    pub fn clear(&mut self) {
        self.buffer.fill(0.0);
        self.write_pos = 0;
    }

    /// Returns the capacity in samples.
    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }
}

/// Fixed-length delay processor.
///
/// Each call writes the input first and then reads `delay` samples back, so a
/// delay of 0 is an exact passthrough and a delay of 2.5 returns the average
/// of the inputs two and three samples ago.
#[derive(Debug, Clone)]
pub struct DelayLine {
    line: InterpolatedDelay,
    delay_samples: f32,
}

impl DelayLine {
    /// Creates a delay processor able to delay by up to `max_delay_samples`.
    ///
    /// Allocates `max_delay_samples + 2` slots: one for the current input and
    /// one for the second linear-interpolation tap.
    pub fn new(max_delay_samples: usize) -> Self {
        Self {
            line: InterpolatedDelay::new(max_delay_samples + 2),
            delay_samples: 0.0,
        }
    }

    /// Sets the delay in samples, clamped to `0.0..=max_delay()`.
    #[inline]
    pub fn set_delay(&mut self, delay_samples: f32) {
        self.delay_samples = delay_samples.clamp(0.0, self.max_delay());
    }

    /// Current delay in samples.
    #[inline]
    pub fn delay(&self) -> f32 {
        self.delay_samples
    }

    /// Largest delay this line can produce, in samples.
    pub fn max_delay(&self) -> f32 {
        (self.line.capacity() - 2) as f32
    }
}

impl Default for DelayLine {
    fn default() -> Self {
        Self::new(0)
    }
}

impl Processor for DelayLine {
    #[inline]
    fn process(&mut self, input: f32) -> f32 {
        self.line.write(input);
        self.line.read(self.delay_samples)
    }

    fn reset(&mut self) {
        self.line.clear();
    }
}
