//! WAV file reading and writing.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use hound::{SampleFormat, WavReader, WavWriter};

use crate::stereo::StereoSamples;
use crate::{Error, Result};

/// WAV audio encoding format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WavFormat {
    /// Linear PCM (integer samples).
    Pcm,
    /// IEEE 754 floating-point samples.
    IeeeFloat,
}

/// WAV file metadata extracted without loading sample data.
#[derive(Debug, Clone)]
pub struct WavInfo {
    /// Number of audio channels.
    pub channels: u16,
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Bit depth per sample.
    pub bits_per_sample: u16,
    /// Total number of sample frames (samples per channel).
    pub num_frames: u64,
    /// Duration in seconds.
    pub duration_secs: f64,
    /// Audio encoding format.
    pub format: WavFormat,
}

/// WAV file specification.
///
/// 32 bits means IEEE float; 16 and 24 bits mean integer PCM.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavSpec {
    /// Number of audio channels in the file.
    pub channels: u16,
    /// Sample rate in Hz (e.g., 44100, 48000).
    pub sample_rate: u32,
    /// Bit depth per sample (16, 24 or 32).
    pub bits_per_sample: u16,
}

impl Default for WavSpec {
    fn default() -> Self {
        Self {
            channels: 2,
            sample_rate: 44100,
            bits_per_sample: 32,
        }
    }
}

impl From<hound::WavSpec> for WavSpec {
    fn from(spec: hound::WavSpec) -> Self {
        Self {
            channels: spec.channels,
            sample_rate: spec.sample_rate,
            bits_per_sample: spec.bits_per_sample,
        }
    }
}

fn open(path: &Path) -> Result<WavReader<BufReader<File>>> {
    let file = File::open(path)?;
    Ok(WavReader::new(BufReader::new(file))?)
}

/// Read WAV metadata without loading sample data.
pub fn read_wav_info<P: AsRef<Path>>(path: P) -> Result<WavInfo> {
    let reader = open(path.as_ref())?;
    let spec = reader.spec();
    let num_frames = u64::from(reader.duration());
    let duration_secs = num_frames as f64 / f64::from(spec.sample_rate);

    let format = match spec.sample_format {
        SampleFormat::Float => WavFormat::IeeeFloat,
        SampleFormat::Int => WavFormat::Pcm,
    };

    Ok(WavInfo {
        channels: spec.channels,
        sample_rate: spec.sample_rate,
        bits_per_sample: spec.bits_per_sample,
        num_frames,
        duration_secs,
        format,
    })
}

/// Read a WAV file as stereo f32 samples along with its spec.
///
/// Mono files are duplicated to both channels; files with more than two
/// channels keep only the first two. Integer PCM is scaled to [-1, 1).
/// The returned spec describes the file as stored.
pub fn read_wav_stereo<P: AsRef<Path>>(path: P) -> Result<(StereoSamples, WavSpec)> {
    let path = path.as_ref();
    let reader = open(path)?;
    let hound_spec = reader.spec();
    let spec = WavSpec::from(hound_spec);

    let interleaved: Vec<f32> = match hound_spec.sample_format {
        SampleFormat::Float => reader
            .into_samples::<f32>()
            .collect::<std::result::Result<Vec<_>, _>>()?,
        SampleFormat::Int => {
            let scale = full_scale(spec.bits_per_sample)?;
            reader
                .into_samples::<i32>()
                .map(|s| s.map(|v| v as f32 / scale))
                .collect::<std::result::Result<Vec<_>, _>>()?
        }
    };

    let samples = StereoSamples::from_interleaved(&interleaved, usize::from(spec.channels));
    tracing::debug!(
        path = %path.display(),
        channels = spec.channels,
        sample_rate = spec.sample_rate,
        frames = samples.len(),
        "read wav"
    );
    Ok((samples, spec))
}

/// Write stereo samples to a WAV file.
///
/// The file always has two channels regardless of `spec.channels`. 32 bits
/// writes IEEE float; 16 and 24 bits write PCM with samples clamped to
/// full scale. Any other depth is refused.
pub fn write_wav_stereo<P: AsRef<Path>>(
    path: P,
    samples: &StereoSamples,
    spec: WavSpec,
) -> Result<()> {
    let path = path.as_ref();
    let sample_format = match spec.bits_per_sample {
        32 => SampleFormat::Float,
        16 | 24 => SampleFormat::Int,
        bits => {
            return Err(Error::UnsupportedFormat(format!(
                "{bits}-bit output (expected 16, 24 or 32)"
            )));
        }
    };
    let hound_spec = hound::WavSpec {
        channels: 2,
        sample_rate: spec.sample_rate,
        bits_per_sample: spec.bits_per_sample,
        sample_format,
    };

    let file = BufWriter::new(File::create(path)?);
    let mut writer = WavWriter::new(file, hound_spec)?;

    match sample_format {
        SampleFormat::Float => {
            for sample in samples.to_interleaved() {
                writer.write_sample(sample)?;
            }
        }
        SampleFormat::Int => {
            let scale = full_scale(spec.bits_per_sample)?;
            for sample in samples.to_interleaved() {
                let quantized = (sample * scale).round().clamp(-scale, scale - 1.0) as i32;
                writer.write_sample(quantized)?;
            }
        }
    }
    writer.finalize()?;

    tracing::debug!(
        path = %path.display(),
        bits = spec.bits_per_sample,
        frames = samples.len(),
        "wrote wav"
    );
    Ok(())
}

fn full_scale(bits: u16) -> Result<f32> {
    match bits {
        1..=32 => Ok((1_i64 << (bits - 1)) as f32),
        _ => Err(Error::UnsupportedFormat(format!("{bits}-bit PCM"))),
    }
}
