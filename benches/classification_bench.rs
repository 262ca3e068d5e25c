//! Performance benchmarks for per-frame classification

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use spectral_guide::filters::{HistogramFilter, MovingMedian};
use spectral_guide::{ChannelGuide, GuideConfig};

/// Magnitude frames with a few stable partials and a broadband hit every 16 frames
fn synthetic_frames(bins: usize, count: usize) -> Vec<Vec<f64>> {
    (0..count)
        .map(|frame| {
            (0..bins)
                .map(|bin| {
                    let partial = if bin % 37 == 0 { 1.0 } else { 0.02 };
                    let hit = if frame % 16 == 0 { 0.5 } else { 0.0 };
                    let noise = ((bin * 7919 + frame * 104729) % 97) as f64 * 1e-4;
                    partial + hit + noise
                })
                .collect()
        })
        .collect()
}

fn bench_channel_guide(c: &mut Criterion) {
    let config = GuideConfig::new(2048, 48000.0);
    let mut guide = ChannelGuide::new(&config).expect("Default config is valid");
    let frames = synthetic_frames(guide.bin_count(), 64);

    c.bench_function("channel_guide_advance_2048", |b| {
        let mut index = 0;
        b.iter(|| {
            guide.advance(black_box(&frames[index % frames.len()]));
            index += 1;
            black_box(guide.next_segmentation())
        });
    });
}

fn bench_filters(c: &mut Criterion) {
    let values: Vec<f64> = (0..4096).map(|i| ((i * 7919) % 1000) as f64).collect();

    c.bench_function("moving_median_filter_4096_len10", |b| {
        let mut mm = MovingMedian::<f64>::new(10);
        let mut scratch = values.clone();
        b.iter(|| {
            scratch.copy_from_slice(&values);
            MovingMedian::filter(&mut mm, black_box(&mut scratch));
        });
    });

    let classes: Vec<usize> = (0..4096).map(|i| (i * 31 / 7) % 3).collect();
    c.bench_function("modal_filter_4096_len18", |b| {
        let mut hf = HistogramFilter::new(18, 3);
        let mut scratch = classes.clone();
        b.iter(|| {
            scratch.copy_from_slice(&classes);
            HistogramFilter::modal_filter(&mut hf, black_box(&mut scratch));
        });
    });
}

criterion_group!(benches, bench_channel_guide, bench_filters);
criterion_main!(benches);
