//! Criterion benchmarks for stochastic_engine.
//!
//! Benchmarks cover:
//! - Distribution sampling throughput
//! - Monte Carlo runs with varying iteration counts
//! - Markov chain and random walk runs

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand_distr::Distribution;
use stochastic_core::distributions::{DistributionParams, DistributionSampler};
use stochastic_core::rng::LabRng;
use stochastic_engine::progress::NoProgress;
use stochastic_engine::{
    run_markov_chain, run_monte_carlo, run_random_walk, Estimator, MarkovChainConfig,
    MonteCarloConfig, RandomWalkConfig, WalkDimensions,
};

/// Benchmark raw sampler throughput per distribution.
fn bench_sampling(c: &mut Criterion) {
    let mut group = c.benchmark_group("sampling");

    let distributions = [
        DistributionParams::normal(0.0, 1.0),
        DistributionParams::exponential(1.5),
        DistributionParams::poisson(4.0),
        DistributionParams::poisson(120.0),
        DistributionParams::binomial(50, 0.3),
        DistributionParams::binomial(5_000, 0.3),
    ];

    for params in distributions {
        let sampler = DistributionSampler::new(params).unwrap();
        group.bench_function(BenchmarkId::new(params.name(), format!("{:?}", params)), |b| {
            let mut rng = LabRng::from_seed(42);
            b.iter(|| {
                let mut sum = 0.0;
                for _ in 0..10_000 {
                    sum += sampler.sample(&mut rng);
                }
                black_box(sum)
            });
        });
    }

    group.finish();
}

/// Benchmark Monte Carlo runs with varying iteration counts.
fn bench_monte_carlo(c: &mut Criterion) {
    let mut group = c.benchmark_group("monte_carlo");
    group.sample_size(20);

    for iterations in [10_000u64, 100_000, 1_000_000] {
        group.bench_with_input(
            BenchmarkId::new("normal_mean", iterations),
            &iterations,
            |b, &n| {
                let config = MonteCarloConfig::new(n, DistributionParams::normal(0.0, 1.0));
                b.iter(|| {
                    let mut rng = LabRng::from_seed(42);
                    black_box(run_monte_carlo(&config, &mut rng, &mut NoProgress).unwrap())
                });
            },
        );

        group.bench_with_input(
            BenchmarkId::new("pi_geometric", iterations),
            &iterations,
            |b, &n| {
                let config = MonteCarloConfig::new(n, DistributionParams::normal(0.0, 1.0))
                    .with_estimator(Estimator::PiGeometric);
                b.iter(|| {
                    let mut rng = LabRng::from_seed(42);
                    black_box(run_monte_carlo(&config, &mut rng, &mut NoProgress).unwrap())
                });
            },
        );
    }

    group.finish();
}

/// Benchmark Markov chains and random walks at a fixed step count.
fn bench_paths(c: &mut Criterion) {
    let mut group = c.benchmark_group("paths");
    group.sample_size(20);
    let steps = 200_000;

    let chain = MarkovChainConfig::new(
        vec!["bull".into(), "bear".into(), "flat".into()],
        vec![
            vec![0.9, 0.075, 0.025],
            vec![0.15, 0.8, 0.05],
            vec![0.25, 0.25, 0.5],
        ],
        0,
        steps,
    );
    group.bench_function("markov_3_states", |b| {
        b.iter(|| {
            let mut rng = LabRng::from_seed(7);
            black_box(run_markov_chain(&chain, &mut rng, &mut NoProgress).unwrap())
        });
    });

    for dimensions in [WalkDimensions::One, WalkDimensions::Two] {
        let walk = RandomWalkConfig::new(dimensions, steps, DistributionParams::normal(0.0, 1.0));
        group.bench_function(format!("random_walk_{}d", u8::from(dimensions)), |b| {
            b.iter(|| {
                let mut rng = LabRng::from_seed(7);
                black_box(run_random_walk(&walk, &mut rng, &mut NoProgress).unwrap())
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_sampling, bench_monte_carlo, bench_paths);
criterion_main!(benches);
