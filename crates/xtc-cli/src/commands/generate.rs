//! Deterministic stereo test signals.

use std::path::{Path, PathBuf};

use clap::{Args, Subcommand};
use xtc_io::{StereoSamples, WavSpec, write_wav_stereo};

#[derive(Args)]
pub struct GenerateArgs {
    #[command(subcommand)]
    command: GenerateCommand,
}

/// Options shared by every signal.
#[derive(Args)]
struct OutputArgs {
    /// Output WAV file
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,

    /// Sample rate
    #[arg(long, default_value = "44100")]
    sample_rate: u32,

    /// Output bit depth (16, 24, or 32)
    #[arg(long, default_value = "32")]
    bit_depth: u16,
}

#[derive(Subcommand)]
enum GenerateCommand {
    /// Generate a sine tone on both channels
    Tone {
        #[command(flatten)]
        out: OutputArgs,

        /// Frequency in Hz
        #[arg(long, default_value = "1000.0")]
        freq: f32,

        /// Duration in seconds
        #[arg(long, default_value = "1.0")]
        duration: f32,

        /// Exact length in samples (overrides --duration)
        #[arg(long)]
        samples: Option<usize>,

        /// Amplitude (0-1)
        #[arg(long, default_value = "1.0")]
        amplitude: f32,
    },

    /// Generate a single-sample impulse on both channels
    Impulse {
        #[command(flatten)]
        out: OutputArgs,

        /// Length in samples
        #[arg(long, default_value = "44100")]
        length: usize,

        /// Impulse amplitude
        #[arg(long, default_value = "1.0")]
        amplitude: f32,
    },

    /// Generate silence
    Silence {
        #[command(flatten)]
        out: OutputArgs,

        /// Duration in seconds
        #[arg(long, default_value = "1.0")]
        duration: f32,
    },
}

pub fn run(args: GenerateArgs) -> anyhow::Result<()> {
    let (out, signal) = match args.command {
        GenerateCommand::Tone {
            out,
            freq,
            duration,
            samples,
            amplitude,
        } => {
            let len = samples.unwrap_or_else(|| frames(duration, out.sample_rate));
            println!("Generating sine tone...");
            println!("  {freq} Hz, {len} samples at {} Hz", out.sample_rate);
            let tone = sine(freq, amplitude, out.sample_rate, len);
            (out, StereoSamples::from_mono(tone))
        }

        GenerateCommand::Impulse {
            out,
            length,
            amplitude,
        } => {
            println!("Generating impulse...");
            let mut impulse = vec![0.0; length];
            if let Some(first) = impulse.first_mut() {
                *first = amplitude;
            }
            (out, StereoSamples::from_mono(impulse))
        }

        GenerateCommand::Silence { out, duration } => {
            println!("Generating silence...");
            println!("  {duration:.2}s at {} Hz", out.sample_rate);
            let len = frames(duration, out.sample_rate);
            (out, StereoSamples::silence(len))
        }
    };

    write(&out.output, &signal, out.sample_rate, out.bit_depth)
}

fn frames(duration: f32, sample_rate: u32) -> usize {
    (f64::from(duration.max(0.0)) * f64::from(sample_rate)).round() as usize
}

/// Sine with the phase computed per sample in f64.
fn sine(freq: f32, amplitude: f32, sample_rate: u32, len: usize) -> Vec<f32> {
    let step = std::f64::consts::TAU * f64::from(freq) / f64::from(sample_rate);
    (0..len)
        .map(|n| ((n as f64 * step).sin() * f64::from(amplitude)) as f32)
        .collect()
}

fn write(path: &Path, samples: &StereoSamples, sample_rate: u32, bits: u16) -> anyhow::Result<()> {
    let spec = WavSpec {
        channels: 2,
        sample_rate,
        bits_per_sample: bits,
    };
    write_wav_stereo(path, samples, spec)?;
    println!("Wrote {} samples to {}", samples.len(), path.display());
    Ok(())
}
