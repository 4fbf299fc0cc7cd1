//! Offline rendering of a WAV file through the crosstalk engine.

use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use xtc_core::linear_to_db;
use xtc_effects::{Crosstalk, params};
use xtc_io::{StereoSamples, WavSpec, read_wav_stereo, write_wav_stereo};

#[derive(Args)]
pub struct ProcessArgs {
    /// Input WAV file
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output WAV file (always stereo)
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,

    /// Feedback attenuation in dB (-4.0 to -2.0)
    #[arg(long, default_value = "-3.0", allow_negative_numbers = true)]
    attenuation: f32,

    /// Feedback delay in milliseconds (0.06 to 0.1)
    #[arg(long, default_value = "0.06")]
    delay: f32,

    /// Filter slope: 0 = 12 dB/Oct, 1 = 24 dB/Oct, 2 = 36 dB/Oct
    #[arg(long, default_value = "0", value_parser = clap::value_parser!(u8).range(0..=2))]
    filter_type: u8,

    /// Processing block size
    #[arg(long, default_value = "512")]
    block_size: usize,

    /// Output bit depth (16, 24, or 32)
    #[arg(long, default_value = "32")]
    bit_depth: u16,
}

pub fn run(args: ProcessArgs) -> anyhow::Result<()> {
    if !matches!(args.bit_depth, 16 | 24 | 32) {
        anyhow::bail!("Unsupported bit depth {} (expected 16, 24 or 32)", args.bit_depth);
    }
    if args.block_size == 0 {
        anyhow::bail!("Block size must be at least 1");
    }

    println!("Reading {}...", args.input.display());
    let (samples, spec) = read_wav_stereo(&args.input)
        .with_context(|| format!("failed to read {}", args.input.display()))?;
    let sample_rate = spec.sample_rate as f32;
    println!(
        "  {} frames, {} channel(s), {} Hz, {:.2}s",
        samples.len(),
        spec.channels,
        spec.sample_rate,
        samples.len() as f32 / sample_rate
    );

    let mut engine = Crosstalk::new();
    let store = engine.params().clone();
    let requested = [
        (params::ATTENUATION, args.attenuation),
        (params::DELAY, args.delay),
        (params::FILTER_TYPE, f32::from(args.filter_type)),
    ];
    for (index, value) in requested {
        store.set_value(index, value);
        let applied = store.get_value(index).unwrap_or(value);
        match store.descriptor(index) {
            Some(desc) if applied != value => tracing::warn!(
                param = desc.name,
                requested = value,
                applied,
                "parameter clamped to range"
            ),
            _ => {}
        }
    }
    engine
        .prepare(sample_rate, args.block_size)
        .with_context(|| format!("cannot process audio at {} Hz", spec.sample_rate))?;

    let settings = store.settings();
    println!(
        "Processing: attenuation {:.2} dB, delay {:.3} ms, {}",
        settings.attenuation_db,
        settings.delay_ms,
        settings.filter_order.label()
    );

    let mut output = samples.clone();
    render(&mut engine, &mut output, args.block_size)?;

    println!("\nStats:");
    print_levels("Input: ", &samples);
    print_levels("Output:", &output);

    let out_spec = WavSpec {
        channels: 2,
        sample_rate: spec.sample_rate,
        bits_per_sample: args.bit_depth,
    };
    println!("\nWriting {}...", args.output.display());
    write_wav_stereo(&args.output, &output, out_spec)
        .with_context(|| format!("failed to write {}", args.output.display()))?;
    println!("Done!");

    Ok(())
}

/// Runs the engine over `samples` in host-sized blocks, with progress.
fn render(
    engine: &mut Crosstalk,
    samples: &mut StereoSamples,
    block_size: usize,
) -> anyhow::Result<()> {
    let total = samples.len();
    let pb = ProgressBar::new(total as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")?
            .progress_chars("##-"),
    );

    let StereoSamples { left, right } = samples;
    for (l, r) in left.chunks_mut(block_size).zip(right.chunks_mut(block_size)) {
        let frames = l.len() as u64;
        engine.process_block(&mut [l, r]);
        pb.inc(frames);
    }
    pb.finish_with_message("done");

    tracing::debug!(frames = total, block_size, "render finished");
    Ok(())
}

fn print_levels(label: &str, samples: &StereoSamples) {
    println!(
        "  {label} RMS {:.1} dB, Peak {:.1} dB",
        linear_to_db(samples.rms()),
        linear_to_db(samples.peak())
    );
}
