//! Markov chain engine.
//!
//! At each step the current state is counted, folded into the statistics
//! kernels as its index, and then replaced by a successor drawn from the
//! current row of the transition matrix. Convergence follows the running
//! share of steps spent in state `0`.

use stochastic_core::rng::LabRng;
use stochastic_core::stats::{
    ConvergenceTracker, Statistics, StreamingHistogram, WelfordState, DEFAULT_BIN_COUNT,
    DEFAULT_MAX_POINTS, MAX_SAMPLED_POINTS,
};
use stochastic_core::SimulationError;
use tracing::{debug, info};

use crate::config::{MarkovChainConfig, SimulationKind};
use crate::progress::{ProgressSink, ProgressTracker};
use crate::result::{Decimator, RunClock, SimulationResult, StateFrequency};

/// Runs a Markov chain simulation.
///
/// The configuration is validated before the first transition; a malformed
/// matrix never produces partial output. Zero steps is accepted and yields
/// all-zero frequencies and statistics.
///
/// # Errors
///
/// Returns [`SimulationError::InvalidTransitionMatrix`] or
/// [`SimulationError::InvalidStateSpace`] for a malformed chain, and
/// [`SimulationError::Cancelled`] if the progress sink aborts.
///
/// # Examples
///
/// ```rust
/// use stochastic_core::rng::LabRng;
/// use stochastic_engine::progress::NoProgress;
/// use stochastic_engine::{run_markov_chain, MarkovChainConfig};
///
/// let config = MarkovChainConfig::new(
///     vec!["sunny".into(), "rainy".into()],
///     vec![vec![0.9, 0.1], vec![0.5, 0.5]],
///     0,
///     50_000,
/// );
/// let mut rng = LabRng::from_seed(11);
/// let result = run_markov_chain(&config, &mut rng, &mut NoProgress).unwrap();
///
/// let frequencies = result.state_frequencies.unwrap();
/// assert!((frequencies[0].frequency - 5.0 / 6.0).abs() < 0.02);
/// ```
pub fn run_markov_chain<P: ProgressSink + ?Sized>(
    config: &MarkovChainConfig,
    rng: &mut LabRng,
    progress: &mut P,
) -> Result<SimulationResult, SimulationError> {
    config.validate()?;

    let clock = RunClock::start();
    let steps = config.steps;
    let state_count = config.states.len();

    debug!(
        states = state_count,
        steps,
        initial_state = config.initial_state,
        seed = rng.seed(),
        "Starting Markov chain simulation"
    );

    let mut counts = vec![0u64; state_count];
    let mut welford = WelfordState::new();
    let mut histogram = StreamingHistogram::new(
        0.0,
        (state_count - 1) as f64,
        state_count.min(DEFAULT_BIN_COUNT),
    );
    let mut convergence = ConvergenceTracker::new(steps, DEFAULT_MAX_POINTS, 1.0);
    let mut tracker = ProgressTracker::for_sink(steps, progress);
    let decimator = Decimator::new(steps, MAX_SAMPLED_POINTS);
    let mut values = Vec::with_capacity(decimator.capacity());
    let mut state_path = Vec::with_capacity(decimator.capacity());

    let mut current = config.initial_state;
    for i in 0..steps {
        counts[current] += 1;

        let index = current as f64;
        welford.update(index);
        histogram.update(index);
        convergence.update(if current == 0 { 1.0 } else { 0.0 });
        if decimator.keeps(i) {
            values.push(index);
            state_path.push(config.states[current].clone());
        }

        current = next_state(&config.transition_matrix[current], rng.gen_uniform());
        tracker.tick(i + 1, progress)?;
    }

    let state_frequencies = config
        .states
        .iter()
        .zip(&counts)
        .map(|(state, &count)| StateFrequency {
            state: state.clone(),
            frequency: if steps == 0 {
                0.0
            } else {
                count as f64 / steps as f64
            },
        })
        .collect();

    let statistics = Statistics::from_summary(&welford.finalize());
    let execution_time_ms = clock.elapsed_ms();
    info!(steps, execution_time_ms, "Markov chain simulation finished");

    Ok(SimulationResult {
        kind: SimulationKind::MarkovChain,
        executed_at: clock.executed_at(),
        execution_time_ms,
        iterations: steps,
        seed: rng.seed(),
        values,
        statistics,
        histogram: Some(histogram.finalize()),
        convergence: Some(convergence.finalize()),
        state_path: Some(state_path),
        state_frequencies: Some(state_frequencies),
        path: None,
    })
}

/// Picks the first state whose cumulative probability exceeds `draw`.
///
/// Rows are only required to sum to 1 within tolerance, so a draw can land
/// past the cumulative total; it then falls back to the last state with a
/// positive probability.
fn next_state(row: &[f64], draw: f64) -> usize {
    let mut cumulative = 0.0;
    for (j, &p) in row.iter().enumerate() {
        cumulative += p;
        if draw < cumulative {
            return j;
        }
    }
    row.iter().rposition(|&p| p > 0.0).unwrap_or(row.len() - 1)
}
