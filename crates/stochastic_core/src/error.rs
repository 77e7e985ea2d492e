//! Error types for the Stochastic Lab simulation core.
//!
//! Every error in this module is a configuration or validation failure that
//! is raised before any iteration runs, with the single exception of
//! [`SimulationError::Cancelled`], which an engine returns when its progress
//! sink reports that the surrounding execution context has been discarded.

use thiserror::Error;

/// Error raised by samplers, statistics kernels and simulation engines.
///
/// The `Display` form of each variant is the message surfaced verbatim to the
/// caller when a run fails.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum SimulationError {
    /// A distribution parameter is outside its valid domain.
    #[error("Invalid distribution parameter '{name}': {reason}")]
    InvalidDistribution {
        /// Parameter name as it appears in the configuration.
        name: &'static str,
        /// Description of the violation.
        reason: String,
    },

    /// Iteration or step count outside the accepted range.
    #[error("Invalid iteration count {count}: must be in range [{min}, {max}]")]
    InvalidIterationCount {
        /// Requested count.
        count: u64,
        /// Smallest accepted count.
        min: u64,
        /// Largest accepted count.
        max: u64,
    },

    /// Transition matrix has the wrong shape or rows that do not sum to one.
    #[error("Invalid transition matrix: {0}")]
    InvalidTransitionMatrix(String),

    /// State labels or the initial state index are invalid.
    #[error("Invalid state space: {0}")]
    InvalidStateSpace(String),

    /// Any other malformed configuration (unknown simulation type,
    /// unsupported dimensions, unparsable payload).
    #[error("Invalid simulation configuration: {0}")]
    InvalidConfig(String),

    /// The run was abandoned because its execution context was discarded.
    #[error("Simulation cancelled")]
    Cancelled,
}

impl SimulationError {
    /// Creates an [`SimulationError::InvalidDistribution`] error.
    pub fn invalid_distribution(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidDistribution {
            name,
            reason: reason.into(),
        }
    }

    /// Creates an [`SimulationError::InvalidTransitionMatrix`] error.
    pub fn invalid_matrix(reason: impl Into<String>) -> Self {
        Self::InvalidTransitionMatrix(reason.into())
    }

    /// Creates an [`SimulationError::InvalidConfig`] error.
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig(reason.into())
    }

    /// Returns `true` for errors caused by the caller's configuration.
    pub fn is_validation(&self) -> bool {
        !matches!(self, Self::Cancelled)
    }
}
