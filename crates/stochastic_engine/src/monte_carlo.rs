//! Monte Carlo engine.
//!
//! Draws one value per iteration from the configured distribution and folds
//! it into the streaming kernels. The `pi-geometric` estimator instead draws
//! a uniform point in the unit square and records `1` when it falls inside
//! the quarter circle, `0` otherwise; the resulting fraction estimates `π/4`
//! and is rescaled by four at finalisation.

use rand_distr::Distribution;
use stochastic_core::distributions::DistributionSampler;
use stochastic_core::rng::LabRng;
use stochastic_core::stats::{
    ConvergenceTracker, Statistics, StreamingHistogram, WelfordState, DEFAULT_MAX_POINTS,
    MAX_SAMPLED_POINTS,
};
use stochastic_core::SimulationError;
use tracing::{debug, info};

use crate::config::{Estimator, MonteCarloConfig, SimulationKind};
use crate::progress::{ProgressSink, ProgressTracker};
use crate::result::{Decimator, RunClock, SimulationResult};

/// Ratio between the area of the unit square and the quarter circle.
pub const PI_MULTIPLIER: f64 = 4.0;

/// Per-iteration draw.
enum Draw {
    Distribution(DistributionSampler),
    UnitCircle,
}

impl Draw {
    #[inline]
    fn next(&self, rng: &mut LabRng) -> f64 {
        match self {
            Self::Distribution(sampler) => sampler.sample(rng),
            Self::UnitCircle => {
                let x = rng.gen_uniform();
                let y = rng.gen_uniform();
                if x * x + y * y <= 1.0 {
                    1.0
                } else {
                    0.0
                }
            }
        }
    }
}

/// Runs a Monte Carlo simulation.
///
/// # Errors
///
/// Returns a validation error before the first draw if the configuration is
/// invalid, or [`SimulationError::Cancelled`] if the progress sink aborts.
///
/// # Examples
///
/// ```rust
/// use stochastic_core::distributions::DistributionParams;
/// use stochastic_core::rng::LabRng;
/// use stochastic_engine::progress::NoProgress;
/// use stochastic_engine::{run_monte_carlo, MonteCarloConfig};
///
/// let config = MonteCarloConfig::new(20_000, DistributionParams::exponential(2.0));
/// let mut rng = LabRng::from_seed(42);
/// let result = run_monte_carlo(&config, &mut rng, &mut NoProgress).unwrap();
///
/// assert_eq!(result.iterations, 20_000);
/// assert!((result.statistics.mean - 0.5).abs() < 0.02);
/// assert!(result.values.len() <= 10_000);
/// ```
pub fn run_monte_carlo<P: ProgressSink + ?Sized>(
    config: &MonteCarloConfig,
    rng: &mut LabRng,
    progress: &mut P,
) -> Result<SimulationResult, SimulationError> {
    config.validate()?;

    let clock = RunClock::start();
    let iterations = config.iterations;
    let is_pi = config.estimator == Estimator::PiGeometric;

    let (draw, (expected_min, expected_max), multiplier) = if is_pi {
        (Draw::UnitCircle, (0.0, 1.0), PI_MULTIPLIER)
    } else {
        let sampler = DistributionSampler::new(config.distribution)?;
        (
            Draw::Distribution(sampler),
            config.distribution.expected_range(),
            1.0,
        )
    };

    debug!(
        iterations,
        estimator = ?config.estimator,
        distribution = config.distribution.name(),
        seed = rng.seed(),
        "Starting Monte Carlo simulation"
    );

    let mut welford = WelfordState::new();
    let mut histogram = StreamingHistogram::with_default_bins(expected_min, expected_max);
    let mut convergence = ConvergenceTracker::new(iterations, DEFAULT_MAX_POINTS, multiplier);
    let mut tracker = ProgressTracker::for_sink(iterations, progress);
    let decimator = Decimator::new(iterations, MAX_SAMPLED_POINTS);
    let mut values = Vec::with_capacity(decimator.capacity());

    for i in 0..iterations {
        let value = draw.next(rng);

        welford.update(value);
        histogram.update(value);
        convergence.update(value);
        if decimator.keeps(i) {
            values.push(value);
        }

        tracker.tick(i + 1, progress)?;
    }

    let summary = welford.finalize();
    let statistics = if is_pi {
        Statistics::scaled(&summary, PI_MULTIPLIER)
    } else {
        Statistics::from_summary(&summary)
    };

    let execution_time_ms = clock.elapsed_ms();
    info!(
        iterations,
        mean = statistics.mean,
        execution_time_ms,
        "Monte Carlo simulation finished"
    );

    Ok(SimulationResult {
        kind: SimulationKind::MonteCarlo,
        executed_at: clock.executed_at(),
        execution_time_ms,
        iterations,
        seed: rng.seed(),
        values,
        statistics,
        histogram: Some(histogram.finalize()),
        convergence: Some(convergence.finalize()),
        state_path: None,
        state_frequencies: None,
        path: None,
    })
}
