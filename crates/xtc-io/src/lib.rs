//! WAV file I/O for the xtc crosstalk effect.
//!
//! This crate provides:
//!
//! - **Stereo buffers**: [`StereoSamples`], planar left/right sample storage
//!   that hands out the `&mut [&mut [f32]]` view the engine processes
//! - **WAV reading**: [`read_wav_stereo`] (mono is duplicated, extra channels
//!   are dropped) and [`read_wav_info`] for header-only inspection
//! - **WAV writing**: [`write_wav_stereo`] at 16/24-bit PCM or 32-bit float
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use xtc_effects::Crosstalk;
//! use xtc_io::{read_wav_stereo, write_wav_stereo};
//!
//! let (mut samples, spec) = read_wav_stereo("input.wav")?;
//!
//! let mut engine = Crosstalk::new();
//! engine.prepare(spec.sample_rate as f32, samples.len().max(1))?;
//! engine.process_block(&mut samples.planes_mut());
//!
//! write_wav_stereo("output.wav", &samples, spec)?;
//! ```

mod stereo;
mod wav;

pub use stereo::StereoSamples;
pub use wav::{WavFormat, WavInfo, WavSpec, read_wav_info, read_wav_stereo, write_wav_stereo};

/// Error types for audio I/O operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// WAV file read/write error.
    #[error("WAV file error: {0}")]
    Wav(#[from] hound::Error),

    /// The requested sample format is not supported.
    #[error("Unsupported sample format: {0}")]
    UnsupportedFormat(String),

    /// Standard I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience result type for audio I/O operations.
pub type Result<T> = std::result::Result<T, Error>;
