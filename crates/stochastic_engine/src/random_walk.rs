//! Random walk engine.
//!
//! A one-dimensional walk adds `sample + drift` to its position each step
//! and tracks the position itself. A two-dimensional walk moves
//! `|sample| + drift` in a uniformly random direction and tracks the
//! Euclidean distance from the origin. Both start at the origin; step `0`
//! is part of the recorded path but not of the statistics.

use std::f64::consts::TAU;

use rand_distr::Distribution;
use stochastic_core::distributions::{DistributionParams, DistributionSampler};
use stochastic_core::rng::LabRng;
use stochastic_core::stats::{
    decimation_stride, ConvergenceTracker, Statistics, StreamingHistogram, WelfordState,
    DEFAULT_MAX_POINTS, MAX_SAMPLED_POINTS,
};
use stochastic_core::SimulationError;
use tracing::{debug, info};

use crate::config::{RandomWalkConfig, SimulationKind, WalkDimensions};
use crate::progress::{ProgressSink, ProgressTracker};
use crate::result::{PathPoint, RunClock, SimulationResult};

/// Number of standard deviations of the final position covered by the
/// histogram range.
const RANGE_SIGMAS: f64 = 4.0;

/// Runs a random walk simulation.
///
/// # Errors
///
/// Returns a validation error before the first step for an invalid
/// configuration, or [`SimulationError::Cancelled`] if the progress sink
/// aborts.
///
/// # Examples
///
/// ```rust
/// use stochastic_core::distributions::DistributionParams;
/// use stochastic_core::rng::LabRng;
/// use stochastic_engine::progress::NoProgress;
/// use stochastic_engine::{run_random_walk, RandomWalkConfig, WalkDimensions};
///
/// let config = RandomWalkConfig::new(WalkDimensions::Two, 1_000, DistributionParams::normal(0.0, 1.0));
/// let mut rng = LabRng::from_seed(3);
/// let result = run_random_walk(&config, &mut rng, &mut NoProgress).unwrap();
///
/// let path = result.path.unwrap();
/// assert_eq!(path[0].step, 0);
/// assert_eq!(path.last().unwrap().step, 1_000);
/// assert!(result.statistics.min >= 0.0);
/// ```
pub fn run_random_walk<P: ProgressSink + ?Sized>(
    config: &RandomWalkConfig,
    rng: &mut LabRng,
    progress: &mut P,
) -> Result<SimulationResult, SimulationError> {
    config.validate()?;
    let sampler = DistributionSampler::new(config.step_distribution)?;

    debug!(
        dimensions = u8::from(config.dimensions),
        steps = config.steps,
        drift = config.drift,
        distribution = config.step_distribution.name(),
        seed = rng.seed(),
        "Starting random walk simulation"
    );

    match config.dimensions {
        WalkDimensions::One => walk(config, rng, progress, Line::new(sampler, config.drift)),
        WalkDimensions::Two => walk(config, rng, progress, Plane::new(sampler, config.drift)),
    }
}

/// One spatial variant of the walk.
trait Walker {
    /// Advances by one step.
    fn step(&mut self, rng: &mut LabRng);

    /// Quantity folded into the statistics kernels.
    fn observable(&self) -> f64;

    /// Current position as a path point.
    fn point(&self, step: u64) -> PathPoint;

    /// Heuristic histogram range of the observable after `steps` steps.
    fn expected_range(params: &DistributionParams, drift: f64, steps: u64) -> (f64, f64);
}

struct Line {
    sampler: DistributionSampler,
    drift: f64,
    position: f64,
}

impl Line {
    fn new(sampler: DistributionSampler, drift: f64) -> Self {
        Self {
            sampler,
            drift,
            position: 0.0,
        }
    }
}

impl Walker for Line {
    #[inline]
    fn step(&mut self, rng: &mut LabRng) {
        self.position += self.sampler.sample(rng) + self.drift;
    }

    #[inline]
    fn observable(&self) -> f64 {
        self.position
    }

    fn point(&self, step: u64) -> PathPoint {
        PathPoint {
            step,
            x: self.position,
            y: None,
        }
    }

    fn expected_range(params: &DistributionParams, drift: f64, steps: u64) -> (f64, f64) {
        let n = steps as f64;
        let centre = n * (params.mean() + drift);
        let spread = RANGE_SIGMAS * params.variance().sqrt() * n.sqrt();
        (centre.min(0.0) - spread, centre.max(0.0) + spread)
    }
}

struct Plane {
    sampler: DistributionSampler,
    drift: f64,
    x: f64,
    y: f64,
}

impl Plane {
    fn new(sampler: DistributionSampler, drift: f64) -> Self {
        Self {
            sampler,
            drift,
            x: 0.0,
            y: 0.0,
        }
    }
}

impl Walker for Plane {
    #[inline]
    fn step(&mut self, rng: &mut LabRng) {
        let angle = rng.gen_range(0.0, TAU);
        let length = self.sampler.sample(rng).abs() + self.drift;
        self.x += length * angle.cos();
        self.y += length * angle.sin();
    }

    #[inline]
    fn observable(&self) -> f64 {
        self.x.hypot(self.y)
    }

    fn point(&self, step: u64) -> PathPoint {
        PathPoint {
            step,
            x: self.x,
            y: Some(self.y),
        }
    }

    fn expected_range(params: &DistributionParams, drift: f64, steps: u64) -> (f64, f64) {
        // E[L²] for L = |X| + drift is at most (√E[X²] + |drift|)².
        let length = params.second_moment().sqrt() + drift.abs();
        (0.0, RANGE_SIGMAS * (steps as f64).sqrt() * length)
    }
}

fn walk<P: ProgressSink + ?Sized, W: Walker>(
    config: &RandomWalkConfig,
    rng: &mut LabRng,
    progress: &mut P,
    mut walker: W,
) -> Result<SimulationResult, SimulationError> {
    let clock = RunClock::start();
    let steps = config.steps;

    let (expected_min, expected_max) =
        W::expected_range(&config.step_distribution, config.drift, steps);
    let mut welford = WelfordState::new();
    let mut histogram = StreamingHistogram::with_default_bins(expected_min, expected_max);
    let mut convergence = ConvergenceTracker::new(steps, DEFAULT_MAX_POINTS, 1.0);
    let mut tracker = ProgressTracker::for_sink(steps, progress);

    let stride = decimation_stride(steps, MAX_SAMPLED_POINTS);
    let capacity = (steps / stride + 2) as usize;
    let mut path = Vec::with_capacity(capacity);
    let mut values = Vec::with_capacity(capacity);
    path.push(walker.point(0));
    values.push(0.0);

    for step in 1..=steps {
        walker.step(rng);
        let observed = walker.observable();

        welford.update(observed);
        histogram.update(observed);
        convergence.update(observed);
        if step % stride == 0 || step == steps {
            path.push(walker.point(step));
            values.push(observed);
        }

        tracker.tick(step, progress)?;
    }

    let statistics = Statistics::from_summary(&welford.finalize());
    let execution_time_ms = clock.elapsed_ms();
    info!(
        steps,
        final_value = walker.observable(),
        execution_time_ms,
        "Random walk simulation finished"
    );

    Ok(SimulationResult {
        kind: SimulationKind::RandomWalk,
        executed_at: clock.executed_at(),
        execution_time_ms,
        iterations: steps,
        seed: rng.seed(),
        values,
        statistics,
        histogram: Some(histogram.finalize()),
        convergence: Some(convergence.finalize()),
        state_path: None,
        state_frequencies: None,
        path: Some(path),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::NoProgress;
    use approx::assert_relative_eq;

    fn run(config: RandomWalkConfig, seed: u64) -> SimulationResult {
        let mut rng = LabRng::from_seed(seed);
        run_random_walk(&config, &mut rng, &mut NoProgress).unwrap()
    }

    #[test]
    fn test_one_dimensional_path() {
        let result = run(
            RandomWalkConfig::new(WalkDimensions::One, 100, DistributionParams::normal(0.0, 1.0)),
            21,
        );
        let path = result.path.unwrap();

        assert_eq!(path.len(), 101);
        assert_eq!(path[0], PathPoint { step: 0, x: 0.0, y: None });
        assert!(path.iter().all(|p| p.y.is_none()));
        assert_eq!(result.values.len(), 101);
        assert_eq!(result.values[100], path[100].x);
        assert_eq!(result.histogram.unwrap().counts.iter().sum::<u64>(), 100);
    }

    #[test]
    fn test_deterministic_drift() {
        let result = run(
            RandomWalkConfig::new(WalkDimensions::One, 10, DistributionParams::normal(0.0, 0.0))
                .with_drift(0.5),
            1,
        );
        let path = result.path.unwrap();

        assert_relative_eq!(path[10].x, 5.0, epsilon = 1e-12);
        assert_relative_eq!(result.statistics.min, 0.5, epsilon = 1e-12);
        assert_relative_eq!(result.statistics.max, 5.0, epsilon = 1e-12);
        assert_relative_eq!(result.statistics.mean, 2.75, epsilon = 1e-12);
    }

    #[test]
    fn test_two_dimensional_distance() {
        let result = run(
            RandomWalkConfig::new(WalkDimensions::Two, 2_000, DistributionParams::exponential(1.0)),
            17,
        );
        let path = result.path.unwrap();

        assert_eq!(path[0], PathPoint { step: 0, x: 0.0, y: Some(0.0) });
        for (point, value) in path.iter().zip(&result.values) {
            let y = point.y.unwrap();
            assert_relative_eq!(point.x.hypot(y), *value, epsilon = 1e-12);
        }
        assert!(result.statistics.min >= 0.0);
    }

    #[test]
    fn test_two_dimensional_unit_steps() {
        // Fixed unit steps: every move has length exactly one.
        let result = run(
            RandomWalkConfig::new(WalkDimensions::Two, 50, DistributionParams::normal(1.0, 0.0)),
            4,
        );
        let path = result.path.unwrap();
        for pair in path.windows(2) {
            let dx = pair[1].x - pair[0].x;
            let dy = pair[1].y.unwrap() - pair[0].y.unwrap();
            assert_relative_eq!(dx.hypot(dy), 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_long_walk_is_decimated() {
        let result = run(
            RandomWalkConfig::new(WalkDimensions::One, 123_457, DistributionParams::poisson(1.0))
                .with_drift(-1.0),
            2,
        );
        let path = result.path.unwrap();

        assert!(path.len() <= 10_001);
        assert_eq!(path.len(), result.values.len());
        assert_eq!(path.last().unwrap().step, 123_457);
        assert!(path.windows(2).all(|w| w[0].step < w[1].step));
    }

    #[test]
    fn test_invalid_step_distribution() {
        let config =
            RandomWalkConfig::new(WalkDimensions::One, 10, DistributionParams::binomial(10, 2.0));
        let mut rng = LabRng::from_seed(1);
        assert!(matches!(
            run_random_walk(&config, &mut rng, &mut NoProgress),
            Err(SimulationError::InvalidDistribution { name: "p", .. })
        ));
    }

    #[test]
    fn test_expected_ranges() {
        let normal = DistributionParams::normal(1.0, 2.0);
        assert_eq!(Line::expected_range(&normal, 0.0, 100), (-80.0, 180.0));
        assert_eq!(Line::expected_range(&normal, -2.0, 100), (-180.0, 80.0));

        let unit = DistributionParams::normal(1.0, 0.0);
        assert_eq!(Plane::expected_range(&unit, 0.0, 100), (0.0, 40.0));
    }
}
