//! xtc Core - DSP primitives for the crosstalk effect
//!
//! This crate provides the building blocks the crosstalk processor is made of,
//! designed for real-time audio processing with zero allocation in the audio path.
//!
//! # Core Abstractions
//!
//! ## Processors
//!
//! - [`Processor`] - Object-safe trait for in-place mono sample processors
//! - [`ProcessorExt`] - Extension trait for processor chaining
//! - [`Chain`] - Zero-cost processor chain combinator
//!
//! ## Filters
//!
//! - [`Biquad`] - Second-order IIR stage holding shared [`FilterCoefficients`]
//! - [`make_high_pass`] / [`make_low_pass`] - Coefficient factory (Butterworth, RBJ cookbook)
//!
//! ## Delay and Gain
//!
//! - [`InterpolatedDelay`] - Circular buffer with fractional reads
//! - [`DelayLine`] - Processor wrapping an [`InterpolatedDelay`] at a configured length
//! - [`Gain`] - Linear gain processor with a dB setter
//!
//! ## Parameters
//!
//! - [`ParamDescriptor`], [`ParamId`], [`ParamFlags`], [`ParamUnit`] - Parameter metadata
//! - [`ParameterInfo`] - Index-based parameter introspection
//!
//! # no_std Support
//!
//! This crate is `no_std` compatible. Disable the default `std` feature:
//!
//! ```toml
//! [dependencies]
//! xtc-core = { version = "0.1", default-features = false }
//! ```
//!
//! # Example
//!
//! ```rust
//! use xtc_core::{Biquad, Processor, make_low_pass};
//!
//! let coefficients = make_low_pass(48000.0, 5000.0).unwrap();
//! let mut stage = Biquad::with_coefficients(coefficients);
//!
//! let mut block = [1.0_f32; 64];
//! stage.process_block_inplace(&mut block);
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod biquad;
pub mod delay;
pub mod error;
pub mod gain;
pub mod math;
pub mod param_info;
pub mod processor;

// Re-export main types at crate root
pub use biquad::{
    BUTTERWORTH_Q, Biquad, FilterCoefficients, highpass_coefficients, lowpass_coefficients,
    make_high_pass, make_low_pass,
};
pub use delay::{DelayLine, InterpolatedDelay};
pub use error::CoefficientError;
pub use gain::Gain;
pub use math::{db_to_linear, flush_denormal, linear_to_db, ms_to_samples};
pub use param_info::{ParamDescriptor, ParamFlags, ParamId, ParamUnit, ParameterInfo};
pub use processor::{Chain, Processor, ProcessorExt};
