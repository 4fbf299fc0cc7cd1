//! xtc Effects - the crosstalk stereo effect
//!
//! This crate assembles the [`xtc_core`] primitives into the crosstalk
//! processor:
//!
//! - [`CascadedFilter`] - Up to three biquad stages of one role (12/24/36 dB/octave)
//! - [`BandPath`] - High-pass into low-pass cascade, per channel
//! - [`FeedbackPath`] - 40-pass cross-channel gain/delay loop
//! - [`ShelfPath`] - Parallel high-pass or low-pass cascade on the raw input
//! - [`Crosstalk`] - Block processor that runs and sums all of the above
//! - [`CrosstalkParams`] - Lock-free parameter store read once per block
//!
//! ## Example
//!
//! ```rust
//! use xtc_effects::{Crosstalk, FilterOrder, params};
//!
//! let mut engine = Crosstalk::new();
//! engine.params().set_value(params::FILTER_TYPE, FilterOrder::Second.index() as f32);
//! engine.prepare(48000.0, 256).unwrap();
//!
//! let mut left: Vec<f32> = (0..256).map(|i| (i as f32 * 0.05).sin()).collect();
//! let mut right = left.clone();
//! engine.process_block(&mut [&mut left[..], &mut right[..]]);
//! ```
//!
//! ## Features
//!
//! - `std` (default): links the standard library.
//! - `tracing`: logs preparation and layout changes with [`tracing`]. The
//!   processing path never logs.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod band_path;
pub mod cascade;
pub mod crosstalk;
pub mod error;
pub mod feedback;
pub mod params;
pub mod shelf;

// Re-export main types at crate root
pub use band_path::{BandChain, BandPath};
pub use cascade::{CascadedFilter, FilterOrder, FilterRole, MAX_STAGES, ORDER_FADE_SAMPLES};
pub use crosstalk::{BusLayout, Crosstalk, HIGH_PASS_CORNER_HZ, LOW_PASS_CORNER_HZ};
pub use error::EngineError;
pub use feedback::{FEEDBACK_PASSES, FeedbackPath, FeedbackStage};
pub use params::{ChainSettings, CrosstalkParams};
pub use shelf::ShelfPath;
