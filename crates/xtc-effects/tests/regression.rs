//! Regression tests against an independent double-precision model.
//!
//! The model below re-derives the whole signal path from first principles
//! (bilinear-transform Butterworth sections, a sample-history delay read
//! with linear interpolation, the 40-pass cross-coupled loop) in f64 and
//! shares no code with the crate. The engine must track it to within f32
//! rounding.

use xtc_effects::{ChainSettings, Crosstalk, FEEDBACK_PASSES, FilterOrder};

const SAMPLE_RATE: f32 = 44100.0;
const BLOCK: usize = 512;

/// Largest tolerated per-sample deviation from the f64 model.
///
/// Output peaks near 1.4; single-precision coefficients and state carry a
/// relative error around 1e-6 per stage, so 1e-4 leaves two orders of
/// magnitude of headroom while still catching any structural change.
const TOLERANCE: f64 = 1e-4;

// ============================================================================
// Reference model
// ============================================================================

#[derive(Clone, Copy)]
enum Kind {
    HighPass,
    LowPass,
}

#[derive(Clone)]
struct RefSection {
    b: [f64; 3],
    a: [f64; 2],
    x: [f64; 2],
    y: [f64; 2],
}

impl RefSection {
    fn butterworth(kind: Kind, sample_rate: f64, corner: f64) -> Self {
        let k = (std::f64::consts::PI * corner / sample_rate).tan();
        let sqrt2 = std::f64::consts::SQRT_2;
        let norm = 1.0 / (1.0 + sqrt2 * k + k * k);
        let b = match kind {
            Kind::LowPass => {
                let b0 = k * k * norm;
                [b0, 2.0 * b0, b0]
            }
            Kind::HighPass => [norm, -2.0 * norm, norm],
        };
        let a = [2.0 * (k * k - 1.0) * norm, (1.0 - sqrt2 * k + k * k) * norm];
        Self {
            b,
            a,
            x: [0.0; 2],
            y: [0.0; 2],
        }
    }

    fn run(&mut self, x0: f64) -> f64 {
        let y0 = self.b[0] * x0 + self.b[1] * self.x[0] + self.b[2] * self.x[1]
            - self.a[0] * self.y[0]
            - self.a[1] * self.y[1];
        self.x = [x0, self.x[0]];
        self.y = [y0, self.y[0]];
        y0
    }
}

struct RefCascade(Vec<RefSection>);

impl RefCascade {
    fn new(kind: Kind, corner: f64, stages: usize) -> Self {
        Self(vec![
            RefSection::butterworth(kind, f64::from(SAMPLE_RATE), corner);
            stages
        ])
    }

    fn run(&mut self, block: &mut [f64]) {
        for section in &mut self.0 {
            for s in block.iter_mut() {
                *s = section.run(*s);
            }
        }
    }
}

/// Everything ever written, read back `delay` samples behind the newest.
struct RefDelay {
    history: Vec<f64>,
    delay: f64,
}

impl RefDelay {
    fn at(&self, back: usize) -> f64 {
        self.history
            .len()
            .checked_sub(1 + back)
            .map_or(0.0, |i| self.history[i])
    }

    fn run(&mut self, x: f64) -> f64 {
        self.history.push(x);
        let whole = self.delay.floor();
        let frac = self.delay - whole;
        let a = self.at(whole as usize);
        let b = self.at(whole as usize + 1);
        a + (b - a) * frac
    }
}

struct RefModel {
    band_hp: [RefCascade; 2],
    band_lp: [RefCascade; 2],
    high_shelf: [RefCascade; 2],
    low_shelf: [RefCascade; 2],
    delay_l: RefDelay,
    delay_r: RefDelay,
    gain: f64,
}

impl RefModel {
    fn new(settings: &ChainSettings) -> Self {
        let n = settings.filter_order.stages();
        let pair =
            |kind, corner| [RefCascade::new(kind, corner, n), RefCascade::new(kind, corner, n)];
        let delay = f64::from(settings.delay_ms) * f64::from(SAMPLE_RATE) / 1000.0;
        Self {
            band_hp: pair(Kind::HighPass, 250.0),
            band_lp: pair(Kind::LowPass, 5000.0),
            high_shelf: pair(Kind::HighPass, 250.0),
            low_shelf: pair(Kind::LowPass, 5000.0),
            delay_l: RefDelay {
                history: Vec::new(),
                delay,
            },
            delay_r: RefDelay {
                history: Vec::new(),
                delay,
            },
            gain: -10f64.powf(f64::from(settings.attenuation_db) / 20.0),
        }
    }

    fn process(&mut self, input: [&[f64]; 2]) -> [Vec<f64>; 2] {
        let mut band = [input[0].to_vec(), input[1].to_vec()];
        let mut high = band.clone();
        let mut low = band.clone();

        for ch in 0..2 {
            self.band_hp[ch].run(&mut band[ch]);
            self.band_lp[ch].run(&mut band[ch]);
            self.high_shelf[ch].run(&mut high[ch]);
            self.low_shelf[ch].run(&mut low[ch]);
        }

        let [left, right] = &mut band;
        for _ in 0..FEEDBACK_PASSES {
            for s in right.iter_mut() {
                *s = self.delay_l.run(self.gain * *s);
            }
            for s in left.iter_mut() {
                *s = self.delay_r.run(self.gain * *s);
            }
        }

        let mut out = [Vec::new(), Vec::new()];
        for ch in 0..2 {
            out[ch] = (0..band[ch].len())
                .map(|i| band[ch][i] + low[ch][i] + high[ch][i])
                .collect();
        }
        out
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn sine(freq: f64, start: usize, len: usize) -> Vec<f64> {
    (start..start + len)
        .map(|n| (std::f64::consts::TAU * freq * n as f64 / f64::from(SAMPLE_RATE)).sin())
        .collect()
}

fn to_f32(block: &[f64]) -> Vec<f32> {
    block.iter().map(|&s| s as f32).collect()
}

fn max_deviation(actual: &[f32], expected: &[f64]) -> (usize, f64) {
    actual
        .iter()
        .zip(expected.iter())
        .enumerate()
        .map(|(i, (&a, &e))| (i, (f64::from(a) - e).abs()))
        .fold((0, 0.0), |best, cur| if cur.1 > best.1 { cur } else { best })
}

fn run_scenario(settings: ChainSettings, left_freq: f64, right_freq: f64, blocks: usize) {
    let mut engine = Crosstalk::new();
    engine.params().set_settings(&settings);
    engine.prepare(SAMPLE_RATE, BLOCK).unwrap();
    let mut model = RefModel::new(&settings);

    for b in 0..blocks {
        // Quantize the model input to what the engine actually sees.
        let in_l: Vec<f64> = to_f32(&sine(left_freq, b * BLOCK, BLOCK))
            .iter()
            .map(|&s| f64::from(s))
            .collect();
        let in_r: Vec<f64> = to_f32(&sine(right_freq, b * BLOCK, BLOCK))
            .iter()
            .map(|&s| f64::from(s))
            .collect();

        let [exp_l, exp_r] = model.process([&in_l[..], &in_r[..]]);
        let mut left = to_f32(&in_l);
        let mut right = to_f32(&in_r);
        engine.process_block(&mut [&mut left[..], &mut right[..]]);

        for (name, actual, expected) in [("left", &left, &exp_l), ("right", &right, &exp_r)] {
            let (at, dev) = max_deviation(actual, expected);
            assert!(
                dev < TOLERANCE,
                "{settings:?}: block {b} {name} sample {at} deviates by {dev:e} \
                 (engine {}, model {})",
                actual[at],
                expected[at]
            );
        }
    }
}

// ============================================================================
// Scenarios
// ============================================================================

/// 1 kHz sine, −2 dB, 0.06 ms, 12 dB/Oct, one 512-sample block.
#[test]
fn sine_1k_first_order_single_block() {
    run_scenario(
        ChainSettings {
            attenuation_db: -2.0,
            delay_ms: 0.06,
            filter_order: FilterOrder::First,
        },
        1000.0,
        1000.0,
        1,
    );
}

#[test]
fn default_settings_several_blocks() {
    run_scenario(ChainSettings::default(), 1000.0, 440.0, 8);
}

#[test]
fn third_order_long_delay() {
    run_scenario(
        ChainSettings {
            attenuation_db: -4.0,
            delay_ms: 0.1,
            filter_order: FilterOrder::Third,
        },
        2500.0,
        120.0,
        6,
    );
}

#[test]
fn second_order_mid_settings() {
    run_scenario(
        ChainSettings {
            attenuation_db: -2.7,
            delay_ms: 0.083,
            filter_order: FilterOrder::Second,
        },
        700.0,
        7000.0,
        4,
    );
}

/// Two fresh engines fed the same input produce bit-identical output.
#[test]
fn output_is_deterministic() {
    let input = to_f32(&sine(1000.0, 0, BLOCK));
    let render = || {
        let mut engine = Crosstalk::new();
        engine.prepare(SAMPLE_RATE, BLOCK).unwrap();
        let mut left = input.clone();
        let mut right = input.clone();
        for _ in 0..3 {
            engine.process_block(&mut [&mut left[..], &mut right[..]]);
        }
        (left, right)
    };
    let (a_l, a_r) = render();
    let (b_l, b_r) = render();
    assert_eq!(
        a_l.iter().map(|s| s.to_bits()).collect::<Vec<_>>(),
        b_l.iter().map(|s| s.to_bits()).collect::<Vec<_>>()
    );
    assert_eq!(a_r, b_r);
}
