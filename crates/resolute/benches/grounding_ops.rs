//! Grounding Operations Benchmarks
//!
//! Benchmarks for candidate generation, scoring and grounding against an
//! in-memory page.
//!
//! Run with: `cargo bench --bench grounding_ops`

#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use resolute::prelude::*;

fn full_target() -> Target {
    Target::new("submit")
        .with_role("button")
        .with_name("Sign in")
        .with_label("Sign in")
        .with_placeholder("Sign in")
        .with_test_id("login-submit")
        .with_fallback("form#login button[type=submit]")
}

fn bench_candidate_generation(c: &mut Criterion) {
    let mut group = c.benchmark_group("candidate_generation");

    let targets = vec![
        ("role_only", Target::new("a").with_role("navigation")),
        ("label", Target::new("b").with_label("Email")),
        ("role_name", Target::new("c").with_role("button").with_name("Save")),
        ("all_hints", full_target()),
    ];

    for (name, target) in targets {
        group.bench_with_input(BenchmarkId::from_parameter(name), &target, |bench, t| {
            bench.iter(|| black_box(generate_candidates(black_box(t))));
        });
    }

    group.finish();
}

fn bench_scoring(c: &mut Criterion) {
    let mut group = c.benchmark_group("scoring");
    let weights = ScoringWeights::default();

    for count in [0usize, 1, 4, 32] {
        let states = vec![ElementState::interactable(); count];
        let inputs = ScoreInputs::from_probe(&Selector::role("button", "Save"), &states);
        group.bench_with_input(BenchmarkId::new("matches", count), &inputs, |bench, i| {
            bench.iter(|| black_box(resolute::scoring::score(black_box(i), &weights)));
        });
    }

    group.finish();
}

fn bench_ground(c: &mut Criterion) {
    let page = MockPage::new()
        .with(
            &Selector::role("button", "Sign in"),
            vec![ElementState::interactable(); 2],
        )
        .with(&Selector::label("Sign in"), vec![ElementState::hidden()])
        .with(
            &Selector::test_id("login-submit"),
            vec![ElementState::interactable()],
        );
    let grounder = Grounder::default();
    let target = full_target();

    c.bench_function("ground_all_hints", |bench| {
        bench.iter(|| black_box(grounder.ground(&page, black_box(&target))));
    });
}

criterion_group!(
    benches,
    bench_candidate_generation,
    bench_scoring,
    bench_ground
);
criterion_main!(benches);
