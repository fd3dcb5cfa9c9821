//! Verification Benchmarks
//!
//! Run with: `cargo bench --bench verification_bench`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use geo::Point;
use sequence_verifier::expansion::SequenceExpander;
use sequence_verifier::{
    RawAction, RuleBaseOracle, VerificationEngine, VerificationInput, VerifierConfig,
};

const CYCLE: &[&str] = &[
    "poweron",
    "checkbattery",
    "scanarea",
    "moveforward",
    "turnleft",
    "pickobject",
    "releaseobject",
    "flyaway",
    "poweroff",
];

fn sequence(len: usize) -> Vec<RawAction> {
    CYCLE.iter().cycle().take(len).map(|a| RawAction::from(*a)).collect()
}

fn bench_engine(c: &mut Criterion) {
    let config = VerifierConfig::default();
    let engine = VerificationEngine::new(&config);
    let mut group = c.benchmark_group("engine_run");

    for len in [10usize, 100, 1_000] {
        let input = VerificationInput::new(sequence(len)).with_auto_expand(false);
        group.bench_with_input(BenchmarkId::from_parameter(len), &input, |b, input| {
            let mut oracle = RuleBaseOracle::robot();
            b.iter(|| engine.verify_input(&mut oracle, black_box(input)).unwrap())
        });
    }

    group.finish();
}

fn bench_expansion(c: &mut Criterion) {
    let config = VerifierConfig::default();
    let expander = SequenceExpander::new(&config.expansion);
    let actions = sequence(500);
    let targets: Vec<_> = (0..50)
        .map(|i| Point::new((i % 7) as f64 - 3.0, (i % 5) as f64 * 2.0))
        .collect();

    c.bench_function("expand_500_with_targets", |b| {
        b.iter(|| expander.expand(black_box(&actions), black_box(&targets)))
    });
}

criterion_group!(benches, bench_engine, bench_expansion);
criterion_main!(benches);
