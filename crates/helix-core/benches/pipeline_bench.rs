// ─────────────────────────────────────────────────────────────────────
// Helix Energy Kernel — Pipeline Benchmarks
// ─────────────────────────────────────────────────────────────────────
//! Criterion benchmarks for a full recomputation, a merge, the
//! calibration pass and the diagnostic field sampler.

use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use helix_core::{derive_state, NullSink, PipelineContext};
use helix_physics::FieldSampler;
use helix_types::{CalibrationState, ConfigPatch, Configuration, Mode};

// ── derive_state() ──────────────────────────────────────────────────

fn bench_derive_state(c: &mut Criterion) {
    let config = Configuration::default();
    c.bench_function("derive_state", |b| {
        b.iter(|| derive_state(black_box(&config), &CalibrationState::Uncalibrated))
    });
}

// ── PipelineContext ─────────────────────────────────────────────────

fn bench_merge_mode_switch(c: &mut Criterion) {
    let mut ctx = PipelineContext::with_sink(Configuration::default(), Arc::new(NullSink))
        .expect("default configuration is valid");
    let patches = [Mode::Hover, Mode::Cruise].map(|mode| ConfigPatch {
        mode: Some(mode),
        ..Default::default()
    });
    let mut i = 0usize;
    c.bench_function("merge_mode_switch", |b| {
        b.iter(|| {
            i += 1;
            let _ = ctx.merge(black_box(&patches[i % 2]));
        })
    });
}

fn bench_calibrated_context(c: &mut Criterion) {
    let mut config = Configuration::default();
    config.calibration.enabled = true;
    c.bench_function("calibrated_context_new", |b| {
        b.iter(|| PipelineContext::with_sink(black_box(config.clone()), Arc::new(NullSink)))
    });
}

// ── FieldSampler ────────────────────────────────────────────────────

fn bench_sampler_default_grid(c: &mut Criterion) {
    let sampler = FieldSampler::new(&Configuration::default()).expect("valid sampler config");
    c.bench_function("sampler_64x32x5", |b| b.iter(|| black_box(&sampler).samples()));
}

fn bench_sampler_gated(c: &mut Criterion) {
    let mut config = Configuration::default();
    config.sampler.gate = Some(Default::default());
    let sampler = FieldSampler::new(&config).expect("valid sampler config");
    c.bench_function("sampler_gated_64x32x5", |b| {
        b.iter(|| black_box(&sampler).samples())
    });
}

criterion_group!(
    benches,
    bench_derive_state,
    bench_merge_mode_switch,
    bench_calibrated_context,
    bench_sampler_default_grid,
    bench_sampler_gated,
);
criterion_main!(benches);
