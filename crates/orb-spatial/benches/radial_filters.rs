//! Benchmarks for the radial filter design pipeline

use criterion::{Criterion, black_box, criterion_group, criterion_main};

use orb_dsp::rfft_frequencies;
use orb_spatial::{RadialFilterConfig, RegularizationKind, design_radial_filters};

fn bench_design(c: &mut Criterion) {
    let frequencies = rfft_frequencies(2048, 48000.0);

    for (name, kind) in [
        ("tikhonov", RegularizationKind::Tikhonov),
        ("soft", RegularizationKind::Soft),
        ("hard", RegularizationKind::Hard),
    ] {
        let config = RadialFilterConfig::new(0.0875, 7, 40.0, kind);
        c.bench_function(&format!("design_n7_2048_{name}"), |b| {
            b.iter(|| design_radial_filters(black_box(&frequencies), &config).unwrap())
        });
    }
}

criterion_group!(benches, bench_design);
criterion_main!(benches);
