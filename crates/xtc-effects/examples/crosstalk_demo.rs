//! Demonstration of the crosstalk engine
//!
//! Renders sines through each filter slope and reports the level change per
//! frequency, then shows a parameter change being picked up at the next
//! block.
//!
//! Run with: cargo run -p xtc-effects --example crosstalk_demo

use xtc_effects::{ChainSettings, Crosstalk, FilterOrder};

const SAMPLE_RATE: f32 = 48000.0;
const BLOCK: usize = 480;

fn rms(buffer: &[f32]) -> f32 {
    (buffer.iter().map(|s| s * s).sum::<f32>() / buffer.len() as f32).sqrt()
}

/// Level change in dB of a sine at `freq` after `blocks` blocks of settling.
fn level_db(engine: &mut Crosstalk, freq: f32, blocks: usize) -> f32 {
    let mut input = Vec::new();
    let mut output = Vec::new();

    for b in 0..blocks {
        let mut left: Vec<f32> = (b * BLOCK..(b + 1) * BLOCK)
            .map(|n| (2.0 * std::f32::consts::PI * freq * n as f32 / SAMPLE_RATE).sin() * 0.5)
            .collect();
        let mut right = left.clone();
        if b + 1 == blocks {
            input.extend_from_slice(&left);
        }
        engine.process_block(&mut [&mut left[..], &mut right[..]]);
        if b + 1 == blocks {
            output.extend_from_slice(&left);
        }
    }

    20.0 * (rms(&output) / rms(&input)).log10()
}

fn main() {
    println!("Crosstalk Demo");
    println!("==============\n");

    for order in FilterOrder::ALL {
        let mut engine = Crosstalk::new();
        engine.params().set_settings(&ChainSettings {
            filter_order: order,
            ..ChainSettings::default()
        });
        if let Err(err) = engine.prepare(SAMPLE_RATE, BLOCK) {
            eprintln!("prepare failed: {err}");
            return;
        }

        println!("{}:", order.label());
        for freq in [60.0, 250.0, 1000.0, 5000.0, 15000.0] {
            let db = level_db(&mut engine, freq, 20);
            println!("  {freq:>7.0} Hz  {db:+6.2} dB");
        }
    }

    println!("\nParameter change between blocks:");
    let mut engine = Crosstalk::new();
    if let Err(err) = engine.prepare(SAMPLE_RATE, BLOCK) {
        eprintln!("prepare failed: {err}");
        return;
    }
    let ui = engine.params().clone();
    let report = |engine: &Crosstalk| {
        let feedback = engine.feedback_path();
        println!(
            "  gain {:+.4}  delay {:.3} samples  {}",
            feedback.gain(),
            feedback.delay_samples(),
            engine.settings().filter_order.label()
        );
    };

    report(&engine);
    ui.set_settings(&ChainSettings {
        attenuation_db: -2.0,
        delay_ms: 0.1,
        filter_order: FilterOrder::Third,
    });
    report(&engine);
    level_db(&mut engine, 1000.0, 1);
    report(&engine);
}
