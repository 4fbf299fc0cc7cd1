//! Core Processor trait and the chain combinator.
//!
//! The [`Processor`] trait is the common interface of every building block in
//! the crosstalk signal path: filter stages, gain stages and delay lines. All
//! of them are mono and operate in place on a single channel's block, the way
//! the block processor hands each channel to its own chain.
//!
//! ## Design Decisions
//!
//! - **Mono, in place**: a processor owns the state of exactly one channel.
//!   Stereo behaviour comes from pairing two instances.
//!
//! - **Object-safe**: `dyn Processor` works, but the effect uses static
//!   dispatch through [`Chain`] everywhere.
//!
//! - **No allocations**: all methods may be called on the audio thread.

/// Core trait for mono sample processors.
///
/// # Example
///
/// ```rust
/// use xtc_core::Processor;
///
/// struct Invert;
///
/// impl Processor for Invert {
///     fn process(&mut self, input: f32) -> f32 {
///         -input
///     }
///
///     fn reset(&mut self) {}
/// }
///
/// let mut block = [1.0, -0.5];
/// Invert.process_block_inplace(&mut block);
/// assert_eq!(block, [-1.0, 0.5]);
/// ```
pub trait Processor {
    /// Process a single sample, advancing internal state by one sample.
    fn process(&mut self, input: f32) -> f32;

    /// Process a block of samples in place.
    ///
    /// Default implementation calls [`process`](Self::process) per sample.
    fn process_block_inplace(&mut self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            *sample = self.process(*sample);
        }
    }

    /// Reset internal state (filter or delay history) to silence.
    ///
    /// Configuration such as coefficients, gain or delay length is kept.
    fn reset(&mut self);
}

/// Extension trait for chaining processors.
pub trait ProcessorExt: Processor + Sized {
    /// Chain this processor with another; the output of `self` feeds `next`.
    ///
    /// # Example
    /// ```rust
    /// use xtc_core::{Gain, Processor, ProcessorExt};
    ///
    /// let mut chain = Gain::new(2.0).chain(Gain::new(0.25));
    /// assert_eq!(chain.process(1.0), 0.5);
    /// ```
    fn chain<P: Processor>(self, next: P) -> Chain<Self, P> {
        Chain {
            first: self,
            second: next,
        }
    }
}

// Blanket implementation for all processors
impl<T: Processor> ProcessorExt for T {}

/// Two processors chained in series.
///
/// Block processing runs the whole block through `first`, then through
/// `second`.
#[derive(Debug, Clone)]
pub struct Chain<A, B> {
    first: A,
    second: B,
}

impl<A: Processor, B: Processor> Processor for Chain<A, B> {
    #[inline]
    fn process(&mut self, input: f32) -> f32 {
        let mid = self.first.process(input);
        self.second.process(mid)
    }

    fn process_block_inplace(&mut self, buffer: &mut [f32]) {
        self.first.process_block_inplace(buffer);
        self.second.process_block_inplace(buffer);
    }

    fn reset(&mut self) {
        self.first.reset();
        self.second.reset();
    }
}

impl<A, B> Chain<A, B> {
    /// Get a reference to the first processor in the chain.
    pub fn first(&self) -> &A {
        &self.first
    }

    /// Get a mutable reference to the first processor in the chain.
    pub fn first_mut(&mut self) -> &mut A {
        &mut self.first
    }

    /// Get a reference to the second processor in the chain.
    pub fn second(&self) -> &B {
        &self.second
    }

    /// Get a mutable reference to the second processor in the chain.
    pub fn second_mut(&mut self) -> &mut B {
        &mut self.second
    }
}
