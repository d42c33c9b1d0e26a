// ─────────────────────────────────────────────────────────────────────
// Interdict — Cost Model Benchmarks
// ─────────────────────────────────────────────────────────────────────

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use interdict_core::{next_flip, CostModel};
use interdict_types::{Mechanism, ProtocolProfile, ScopeLevel};

fn profile() -> ProtocolProfile {
    ProtocolProfile::builder(1e8, 1e6, 10.0)
        .scope(ScopeLevel::Asset)
        .sentiment_score(-0.3)
        .build()
        .unwrap()
}

// ── CostModel.breakdown() ───────────────────────────────────────────

fn bench_breakdown(c: &mut Criterion) {
    let model = CostModel::default();
    let p = profile();
    c.bench_function("breakdown_governance", |b| {
        b.iter(|| model.breakdown(black_box(Mechanism::Governance), black_box(&p)))
    });
}

// ── CostModel.recommend() ───────────────────────────────────────────

fn bench_recommend(c: &mut Criterion) {
    let model = CostModel::default();
    let p = profile();
    c.bench_function("recommend", |b| b.iter(|| model.recommend(black_box(&p))));
}

fn bench_recommend_regulated(c: &mut Criterion) {
    let model = CostModel::default();
    let p = profile().to_builder().regulated(true).build().unwrap();
    c.bench_function("recommend_regulated", |b| {
        b.iter(|| model.recommend(black_box(&p)))
    });
}

// ── next_flip() ─────────────────────────────────────────────────────

fn bench_next_flip(c: &mut Criterion) {
    let model = CostModel::default();
    let p = profile();
    c.bench_function("next_flip", |b| b.iter(|| next_flip(&model, black_box(&p))));
}

criterion_group!(
    benches,
    bench_breakdown,
    bench_recommend,
    bench_recommend_regulated,
    bench_next_flip,
);
criterion_main!(benches);
