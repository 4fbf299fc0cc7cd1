//! WAV metadata, plus how `process` would treat the file.

use clap::Args;
use xtc_effects::Crosstalk;
use xtc_io::{WavFormat, read_wav_info};

/// Display WAV file information.
#[derive(Args)]
pub struct InfoArgs {
    /// Path to the WAV file
    pub file: std::path::PathBuf,
}

/// Run the info command.
pub fn run(args: InfoArgs) -> anyhow::Result<()> {
    let info = read_wav_info(&args.file)?;
    let file_size = std::fs::metadata(&args.file)?.len();

    let format = match info.format {
        WavFormat::Pcm => "PCM",
        WavFormat::IeeeFloat => "IEEE Float",
    };
    let routing = match info.channels {
        1 => "mono, duplicated to both channels",
        2 => "stereo",
        _ => "multichannel, first two channels used",
    };
    let rate = match Crosstalk::new().prepare(info.sample_rate as f32, 1) {
        Ok(()) => "supported".to_string(),
        Err(err) => format!("not supported ({err})"),
    };

    println!("File:        {}", args.file.display());
    println!("Format:      {format} {}-bit", info.bits_per_sample);
    println!("Channels:    {} ({routing})", info.channels);
    println!("Sample Rate: {} Hz, {rate}", info.sample_rate);
    println!(
        "Duration:    {:.3}s ({} frames)",
        info.duration_secs, info.num_frames
    );
    println!("File Size:   {}", format_bytes(file_size));

    Ok(())
}

fn format_bytes(bytes: u64) -> String {
    match bytes {
        0..1024 => format!("{bytes} B"),
        1024..1_048_576 => format!("{:.1} KB", bytes as f64 / 1024.0),
        _ => format!("{:.1} MB", bytes as f64 / 1_048_576.0),
    }
}
