//! Routes a [`SimulationConfig`] to its engine.

use stochastic_core::rng::LabRng;
use stochastic_core::SimulationError;

use crate::config::SimulationConfig;
use crate::markov::run_markov_chain;
use crate::monte_carlo::run_monte_carlo;
use crate::progress::ProgressSink;
use crate::random_walk::run_random_walk;
use crate::result::SimulationResult;

/// Runs the engine matching the configuration's `type`.
///
/// # Errors
///
/// Propagates the engine's validation or cancellation error.
///
/// # Examples
///
/// ```rust
/// use stochastic_core::rng::LabRng;
/// use stochastic_engine::progress::NoProgress;
/// use stochastic_engine::{run_simulation, SimulationConfig, SimulationKind};
///
/// let config = SimulationConfig::from_json(
///     r#"{"type":"random-walk","dimensions":1,"steps":500,
///         "stepDistribution":{"type":"normal","params":{"mean":0,"stdDev":1}}}"#,
/// ).unwrap();
/// let result = run_simulation(&config, &mut LabRng::from_seed(1), &mut NoProgress).unwrap();
/// assert_eq!(result.kind, SimulationKind::RandomWalk);
/// ```
pub fn run_simulation<P: ProgressSink + ?Sized>(
    config: &SimulationConfig,
    rng: &mut LabRng,
    progress: &mut P,
) -> Result<SimulationResult, SimulationError> {
    match config {
        SimulationConfig::MonteCarlo(c) => run_monte_carlo(c, rng, progress),
        SimulationConfig::MarkovChain(c) => run_markov_chain(c, rng, progress),
        SimulationConfig::RandomWalk(c) => run_random_walk(c, rng, progress),
    }
}
