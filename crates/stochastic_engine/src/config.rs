//! Simulation configuration types.
//!
//! [`SimulationConfig`] is the tagged union a caller submits. Its JSON form
//! carries a `type` discriminator:
//!
//! ```json
//! { "type": "monte-carlo", "iterations": 100000,
//!   "distribution": { "type": "normal", "params": { "mean": 0, "stdDev": 1 } } }
//! { "type": "markov-chain", "states": ["A", "B"],
//!   "transitionMatrix": [[0.9, 0.1], [0.5, 0.5]], "initialState": 0, "steps": 1000 }
//! { "type": "random-walk", "dimensions": 2, "steps": 5000,
//!   "stepDistribution": { "type": "normal", "params": { "mean": 0, "stdDev": 1 } } }
//! ```
//!
//! Every configuration is validated before any iteration runs.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use stochastic_core::distributions::DistributionParams;
use stochastic_core::SimulationError;

/// Maximum number of iterations (or steps) accepted for a single run.
pub const MAX_ITERATIONS: u64 = 50_000_000;

/// Tolerance on each transition matrix row sum.
pub const ROW_SUM_TOLERANCE: f64 = 1e-3;

/// Kind of simulation, used as the `type` discriminator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SimulationKind {
    /// Independent draws from a distribution.
    MonteCarlo,
    /// Discrete-time Markov chain over labelled states.
    MarkovChain,
    /// One- or two-dimensional random walk.
    RandomWalk,
}

impl SimulationKind {
    /// Returns the kebab-case name used on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MonteCarlo => "monte-carlo",
            Self::MarkovChain => "markov-chain",
            Self::RandomWalk => "random-walk",
        }
    }
}

impl fmt::Display for SimulationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Complete description of one simulation request.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum SimulationConfig {
    /// Monte Carlo sampling.
    MonteCarlo(MonteCarloConfig),
    /// Markov chain simulation.
    MarkovChain(MarkovChainConfig),
    /// Random walk simulation.
    RandomWalk(RandomWalkConfig),
}

impl SimulationConfig {
    /// Parses a configuration from its JSON form.
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::InvalidConfig`] for malformed payloads,
    /// including an unknown `type`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use stochastic_engine::{SimulationConfig, SimulationKind};
    ///
    /// let config = SimulationConfig::from_json(
    ///     r#"{"type":"monte-carlo","iterations":1000,"estimator":"pi-geometric",
    ///         "distribution":{"type":"poisson","params":{"lambda":2}}}"#,
    /// ).unwrap();
    /// assert_eq!(config.kind(), SimulationKind::MonteCarlo);
    ///
    /// assert!(SimulationConfig::from_json(r#"{"type":"brownian-bridge"}"#).is_err());
    /// ```
    pub fn from_json(json: &str) -> Result<Self, SimulationError> {
        serde_json::from_str(json).map_err(|e| SimulationError::invalid_config(e.to_string()))
    }

    /// Returns the simulation kind.
    pub fn kind(&self) -> SimulationKind {
        match self {
            Self::MonteCarlo(_) => SimulationKind::MonteCarlo,
            Self::MarkovChain(_) => SimulationKind::MarkovChain,
            Self::RandomWalk(_) => SimulationKind::RandomWalk,
        }
    }

    /// Returns the number of iterations (or steps) the run will perform.
    pub fn iterations(&self) -> u64 {
        match self {
            Self::MonteCarlo(c) => c.iterations,
            Self::MarkovChain(c) => c.steps,
            Self::RandomWalk(c) => c.steps,
        }
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns the first validation error of the underlying configuration.
    pub fn validate(&self) -> Result<(), SimulationError> {
        match self {
            Self::MonteCarlo(c) => c.validate(),
            Self::MarkovChain(c) => c.validate(),
            Self::RandomWalk(c) => c.validate(),
        }
    }
}

impl From<MonteCarloConfig> for SimulationConfig {
    fn from(config: MonteCarloConfig) -> Self {
        Self::MonteCarlo(config)
    }
}

impl From<MarkovChainConfig> for SimulationConfig {
    fn from(config: MarkovChainConfig) -> Self {
        Self::MarkovChain(config)
    }
}

impl From<RandomWalkConfig> for SimulationConfig {
    fn from(config: RandomWalkConfig) -> Self {
        Self::RandomWalk(config)
    }
}

/// Quantity estimated by a Monte Carlo run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Estimator {
    /// Mean of the configured distribution.
    #[default]
    Mean,
    /// π via the fraction of uniform points inside the unit quarter circle.
    PiGeometric,
    /// `∫ x f(x) dx` of the configured distribution; sampled like `Mean`.
    Integral,
}

/// Monte Carlo configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonteCarloConfig {
    /// Number of draws, in `[1, MAX_ITERATIONS]`.
    pub iterations: u64,
    /// Distribution to draw from (ignored by the π estimator).
    pub distribution: DistributionParams,
    /// Estimator, `mean` when omitted.
    #[serde(default)]
    pub estimator: Estimator,
}

impl MonteCarloConfig {
    /// Creates a `mean` estimator configuration.
    pub fn new(iterations: u64, distribution: DistributionParams) -> Self {
        Self {
            iterations,
            distribution,
            estimator: Estimator::Mean,
        }
    }

    /// Replaces the estimator.
    pub fn with_estimator(mut self, estimator: Estimator) -> Self {
        self.estimator = estimator;
        self
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError`] if:
    /// - `iterations` is 0 or greater than [`MAX_ITERATIONS`]
    /// - the distribution is invalid (not checked for `pi-geometric`)
    pub fn validate(&self) -> Result<(), SimulationError> {
        check_iterations(self.iterations, 1)?;
        if self.estimator != Estimator::PiGeometric {
            self.distribution.validate()?;
        }
        Ok(())
    }
}

/// Markov chain configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkovChainConfig {
    /// Ordered, unique state labels.
    pub states: Vec<String>,
    /// Row-stochastic matrix; `transition_matrix[i][j]` is `P(i → j)`.
    pub transition_matrix: Vec<Vec<f64>>,
    /// Index of the starting state.
    pub initial_state: usize,
    /// Number of steps, in `[0, MAX_ITERATIONS]`.
    pub steps: u64,
}

impl MarkovChainConfig {
    /// Creates a configuration.
    pub fn new(
        states: Vec<String>,
        transition_matrix: Vec<Vec<f64>>,
        initial_state: usize,
        steps: u64,
    ) -> Self {
        Self {
            states,
            transition_matrix,
            initial_state,
            steps,
        }
    }

    /// Validates the state space and the transition matrix.
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError`] if:
    /// - `states` is empty or has duplicate labels
    /// - `initial_state` is out of range
    /// - the matrix is not `|states| × |states|`
    /// - an entry is negative or not finite
    /// - a row sum deviates from 1 by more than [`ROW_SUM_TOLERANCE`]
    /// - `steps` exceeds [`MAX_ITERATIONS`]
    pub fn validate(&self) -> Result<(), SimulationError> {
        let n = self.states.len();
        if n == 0 {
            return Err(SimulationError::InvalidStateSpace(
                "at least one state is required".to_string(),
            ));
        }

        let mut seen = HashSet::with_capacity(n);
        for label in &self.states {
            if !seen.insert(label.as_str()) {
                return Err(SimulationError::InvalidStateSpace(format!(
                    "duplicate state label '{}'",
                    label
                )));
            }
        }

        if self.initial_state >= n {
            return Err(SimulationError::InvalidStateSpace(format!(
                "initial state {} is out of range for {} states",
                self.initial_state, n
            )));
        }

        if self.transition_matrix.len() != n {
            return Err(SimulationError::invalid_matrix(format!(
                "expected {} rows, got {}",
                n,
                self.transition_matrix.len()
            )));
        }

        for (i, row) in self.transition_matrix.iter().enumerate() {
            if row.len() != n {
                return Err(SimulationError::invalid_matrix(format!(
                    "row {} has {} columns, expected {}",
                    i,
                    row.len(),
                    n
                )));
            }
            if let Some(j) = row.iter().position(|p| !p.is_finite() || *p < 0.0) {
                return Err(SimulationError::invalid_matrix(format!(
                    "entry ({}, {}) = {} is not a probability",
                    i, j, row[j]
                )));
            }
            let sum: f64 = row.iter().sum();
            if (sum - 1.0).abs() > ROW_SUM_TOLERANCE {
                return Err(SimulationError::invalid_matrix(format!(
                    "row {} sums to {}, expected 1",
                    i, sum
                )));
            }
        }

        check_iterations(self.steps, 0)
    }
}

/// Number of spatial dimensions of a random walk.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum WalkDimensions {
    /// Walk on the real line.
    One,
    /// Walk in the plane.
    Two,
}

impl TryFrom<u8> for WalkDimensions {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::One),
            2 => Ok(Self::Two),
            other => Err(format!("dimensions must be 1 or 2, got {}", other)),
        }
    }
}

impl From<WalkDimensions> for u8 {
    fn from(value: WalkDimensions) -> Self {
        match value {
            WalkDimensions::One => 1,
            WalkDimensions::Two => 2,
        }
    }
}

/// Random walk configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RandomWalkConfig {
    /// One or two dimensions.
    pub dimensions: WalkDimensions,
    /// Number of steps, in `[1, MAX_ITERATIONS]`.
    pub steps: u64,
    /// Distribution of each step (1D) or of each step length (2D).
    pub step_distribution: DistributionParams,
    /// Constant added to every step, `0` when omitted.
    #[serde(default)]
    pub drift: f64,
}

impl RandomWalkConfig {
    /// Creates a driftless configuration.
    pub fn new(dimensions: WalkDimensions, steps: u64, step_distribution: DistributionParams) -> Self {
        Self {
            dimensions,
            steps,
            step_distribution,
            drift: 0.0,
        }
    }

    /// Replaces the drift.
    pub fn with_drift(mut self, drift: f64) -> Self {
        self.drift = drift;
        self
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError`] if `steps` is out of range, `drift` is not
    /// finite, or the step distribution is invalid.
    pub fn validate(&self) -> Result<(), SimulationError> {
        check_iterations(self.steps, 1)?;
        if !self.drift.is_finite() {
            return Err(SimulationError::invalid_config(format!(
                "drift must be finite, got {}",
                self.drift
            )));
        }
        self.step_distribution.validate()
    }
}

fn check_iterations(count: u64, min: u64) -> Result<(), SimulationError> {
    if count < min || count > MAX_ITERATIONS {
        return Err(SimulationError::InvalidIterationCount {
            count,
            min,
            max: MAX_ITERATIONS,
        });
    }
    Ok(())
}
