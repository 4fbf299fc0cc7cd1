//! Integration tests for the `xtc` binary.
//!
//! Each test runs the built binary against temporary files and checks its
//! exit status, its output and the WAV files it writes.

use std::path::Path;
use std::process::{Command, Output};

use tempfile::TempDir;
use xtc_io::{read_wav_info, read_wav_stereo};

fn xtc_bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_xtc"))
}

fn run(args: &[&str]) -> Output {
    xtc_bin().args(args).output().expect("failed to run xtc")
}

fn path_str(path: &Path) -> &str {
    path.to_str().expect("temp path is not UTF-8")
}

fn generate_tone(dir: &TempDir, name: &str, extra: &[&str]) -> std::path::PathBuf {
    let path = dir.path().join(name);
    let mut args = vec!["generate", "tone", path_str(&path)];
    args.extend_from_slice(extra);
    let output = run(&args);
    assert!(
        output.status.success(),
        "generate failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    path
}

// ---------------------------------------------------------------------------
// `xtc params`
// ---------------------------------------------------------------------------

#[test]
fn params_lists_all_three() {
    let output = run(&["params"]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    for needle in ["Attenuation", "Delay", "Filter Type", "xtc_delay", "36 dB/Oct"] {
        assert!(stdout.contains(needle), "params listing should contain '{needle}'");
    }
}

#[test]
fn params_json_is_machine_readable() {
    let output = run(&["params", "--json"]);
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let entries = value.as_array().unwrap();
    assert_eq!(entries.len(), 3);
    assert_eq!(entries[0]["string_id"], "xtc_attenuation");
    assert_eq!(entries[0]["unit"], "dB");
    assert_eq!(entries[1]["id"], 101);
    assert_eq!(entries[2]["labels"][1], "24 dB/Oct");
    assert_eq!(entries[2]["stepped"], true);
    assert!(entries[0].get("labels").is_none());
}

// ---------------------------------------------------------------------------
// `xtc generate` and `xtc info`
// ---------------------------------------------------------------------------

#[test]
fn generate_tone_with_exact_length() {
    let dir = TempDir::new().unwrap();
    let tone = generate_tone(
        &dir,
        "tone.wav",
        &["--freq", "1000", "--sample-rate", "44100", "--samples", "512"],
    );

    let (samples, spec) = read_wav_stereo(&tone).unwrap();
    assert_eq!(spec.sample_rate, 44100);
    assert_eq!(spec.channels, 2);
    assert_eq!(samples.len(), 512);
    assert_eq!(samples.left, samples.right);
    assert!((samples.peak() - 1.0).abs() < 0.01);
}

#[test]
fn generate_impulse_and_silence() {
    let dir = TempDir::new().unwrap();
    let impulse = dir.path().join("impulse.wav");
    let silence = dir.path().join("silence.wav");

    assert!(run(&["generate", "impulse", path_str(&impulse), "--length", "64"]).status.success());
    assert!(
        run(&["generate", "silence", path_str(&silence), "--duration", "0.5"])
            .status
            .success()
    );

    let (imp, _) = read_wav_stereo(&impulse).unwrap();
    assert_eq!(imp.left[0], 1.0);
    assert!(imp.left[1..].iter().all(|&s| s == 0.0));

    let info = read_wav_info(&silence).unwrap();
    assert_eq!(info.num_frames, 22050);
}

#[test]
fn info_reports_metadata() {
    let dir = TempDir::new().unwrap();
    let tone = generate_tone(&dir, "tone.wav", &["--duration", "0.25", "--bit-depth", "16"]);

    let output = run(&["info", path_str(&tone)]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("PCM 16-bit"));
    assert!(stdout.contains("44100 Hz, supported"));
    assert!(stdout.contains("11025 frames"));
}

// ---------------------------------------------------------------------------
// `xtc process`
// ---------------------------------------------------------------------------

#[test]
fn process_renders_stereo_file() {
    let dir = TempDir::new().unwrap();
    let input = generate_tone(&dir, "in.wav", &["--duration", "0.2"]);
    let output_path = dir.path().join("out.wav");

    let output = run(&[
        "process",
        path_str(&input),
        path_str(&output_path),
        "--attenuation",
        "-2.5",
        "--delay",
        "0.08",
        "--filter-type",
        "2",
        "--block-size",
        "256",
    ]);
    assert!(
        output.status.success(),
        "process failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("36 dB/Oct"));
    assert!(stdout.contains("Stats"));

    let (dry, _) = read_wav_stereo(&input).unwrap();
    let (wet, spec) = read_wav_stereo(&output_path).unwrap();
    assert_eq!(spec.channels, 2);
    assert_eq!(wet.len(), dry.len());
    assert_ne!(wet, dry);
    assert!(wet.left.iter().all(|s| s.is_finite()));
}

#[test]
fn process_silence_stays_silent() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("silence.wav");
    let output_path = dir.path().join("out.wav");
    assert!(run(&["generate", "silence", path_str(&input)]).status.success());

    let output = run(&["process", path_str(&input), path_str(&output_path)]);
    assert!(output.status.success());

    let (wet, _) = read_wav_stereo(&output_path).unwrap();
    assert!(wet.left.iter().chain(wet.right.iter()).all(|&s| s == 0.0));
}

#[test]
fn process_clamps_out_of_range_settings() {
    let dir = TempDir::new().unwrap();
    let input = generate_tone(&dir, "in.wav", &["--duration", "0.05"]);
    let output_path = dir.path().join("out.wav");

    let output = run(&[
        "process",
        path_str(&input),
        path_str(&output_path),
        "--attenuation",
        "-12",
        "--delay",
        "5",
    ]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("attenuation -4.00 dB"));
    assert!(stdout.contains("delay 0.100 ms"));
}

#[test]
fn process_rejects_bad_arguments() {
    let dir = TempDir::new().unwrap();
    let input = generate_tone(&dir, "in.wav", &["--duration", "0.05"]);
    let output_path = dir.path().join("out.wav");

    let bad_depth = run(&[
        "process",
        path_str(&input),
        path_str(&output_path),
        "--bit-depth",
        "12",
    ]);
    assert!(!bad_depth.status.success());

    let bad_slope = run(&[
        "process",
        path_str(&input),
        path_str(&output_path),
        "--filter-type",
        "3",
    ]);
    assert!(!bad_slope.status.success());

    let missing = run(&[
        "process",
        path_str(&dir.path().join("missing.wav")),
        path_str(&output_path),
    ]);
    assert!(!missing.status.success());
    assert!(!output_path.exists());
}

#[test]
fn process_refuses_low_sample_rate() {
    let dir = TempDir::new().unwrap();
    let input = generate_tone(&dir, "in.wav", &["--sample-rate", "8000", "--duration", "0.1"]);
    let output_path = dir.path().join("out.wav");

    let output = run(&["process", path_str(&input), path_str(&output_path)]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("8000 Hz"));
}
