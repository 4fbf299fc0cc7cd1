//! Criterion benchmarks for the crosstalk engine
//!
//! Run with: cargo bench -p xtc-effects
#![allow(missing_docs)]

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use xtc_effects::{BandPath, Crosstalk, FeedbackPath, FilterOrder, params};

const SAMPLE_RATE: f32 = 48000.0;
const BLOCK_SIZES: &[usize] = &[64, 128, 256, 512, 1024];

fn generate_test_signal(size: usize, freq: f32) -> Vec<f32> {
    (0..size)
        .map(|i| {
            let t = i as f32 / SAMPLE_RATE;
            (2.0 * std::f32::consts::PI * freq * t).sin() * 0.5
        })
        .collect()
}

fn bench_engine(c: &mut Criterion) {
    for order in FilterOrder::ALL {
        let mut group = c.benchmark_group(format!("Crosstalk/{}", order.label()));

        for &block_size in BLOCK_SIZES {
            let input_l = generate_test_signal(block_size, 440.0);
            let input_r = generate_test_signal(block_size, 660.0);

            group.bench_with_input(
                BenchmarkId::from_parameter(block_size),
                &block_size,
                |b, &block_size| {
                    let mut engine = Crosstalk::new();
                    engine
                        .params()
                        .set_value(params::FILTER_TYPE, order.index() as f32);
                    engine.prepare(SAMPLE_RATE, block_size).unwrap();
                    let mut left = input_l.clone();
                    let mut right = input_r.clone();
                    b.iter(|| {
                        left.copy_from_slice(&input_l);
                        right.copy_from_slice(&input_r);
                        engine.process_block(black_box(&mut [&mut left[..], &mut right[..]]));
                        black_box(left[0])
                    })
                },
            );
        }

        group.finish();
    }
}

fn bench_feedback(c: &mut Criterion) {
    let mut group = c.benchmark_group("FeedbackPath");

    for &block_size in BLOCK_SIZES {
        let input = generate_test_signal(block_size, 1000.0);

        group.bench_with_input(
            BenchmarkId::from_parameter(block_size),
            &block_size,
            |b, _| {
                let mut band = BandPath::new();
                band.set_coefficients(
                    &xtc_core::make_high_pass(SAMPLE_RATE, 250.0).unwrap(),
                    &xtc_core::make_low_pass(SAMPLE_RATE, 5000.0).unwrap(),
                );
                let mut path = FeedbackPath::new();
                path.allocate(5);
                path.configure(-3.0, 0.08, SAMPLE_RATE);

                let mut left = input.clone();
                let mut right = input.clone();
                b.iter(|| {
                    left.copy_from_slice(&input);
                    right.copy_from_slice(&input);
                    band.process(&mut left, &mut right);
                    path.process(black_box(&mut left), black_box(&mut right));
                    black_box(right[0])
                })
            },
        );
    }

    group.finish();
}

fn bench_parameter_refresh(c: &mut Criterion) {
    let mut engine = Crosstalk::new();
    engine.prepare(SAMPLE_RATE, 512).unwrap();
    let store = engine.params().clone();

    c.bench_function("Crosstalk/update_all", |b| {
        let mut flip = false;
        b.iter(|| {
            flip = !flip;
            store.set_value(params::ATTENUATION, if flip { -2.5 } else { -3.5 });
            engine.update_all();
            black_box(engine.settings())
        })
    });
}

criterion_group!(benches, bench_engine, bench_feedback, bench_parameter_refresh);

criterion_main!(benches);
