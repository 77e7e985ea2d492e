//! Simulation result record.

use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use stochastic_core::stats::{decimation_stride, ConvergenceSeries, Histogram, Statistics};

use crate::config::SimulationKind;

/// Complete output of one simulation run.
///
/// `values`, `path` and `state_path` are decimated views for visualisation
/// and never hold more than about ten thousand entries, whatever the
/// iteration count.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationResult {
    /// Kind of simulation that produced the result.
    #[serde(rename = "type")]
    pub kind: SimulationKind,
    /// Wall-clock time at which the run started.
    pub executed_at: DateTime<Utc>,
    /// Duration of the run in milliseconds.
    pub execution_time_ms: f64,
    /// Number of iterations (or steps) performed.
    pub iterations: u64,
    /// Seed of the random source, for replaying the run.
    pub seed: u64,
    /// Decimated sample of the simulated quantity.
    pub values: Vec<f64>,
    /// Summary statistics over every iteration.
    pub statistics: Statistics,
    /// Histogram over every iteration.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub histogram: Option<Histogram>,
    /// Running-mean convergence curve.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub convergence: Option<ConvergenceSeries>,
    /// Decimated sequence of visited state labels (Markov chain).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state_path: Option<Vec<String>>,
    /// Share of steps spent in each state (Markov chain).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state_frequencies: Option<Vec<StateFrequency>>,
    /// Decimated spatial path (random walk).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<Vec<PathPoint>>,
}

/// Normalised visit frequency of one Markov state.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StateFrequency {
    /// State label.
    pub state: String,
    /// Fraction of steps spent in the state.
    pub frequency: f64,
}

/// Position of a random walk after `step` steps.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PathPoint {
    /// Step index, `0` for the origin.
    pub step: u64,
    /// Position (1D) or horizontal coordinate (2D).
    pub x: f64,
    /// Vertical coordinate, absent for one-dimensional walks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
}

/// Start time of a run, captured before the first iteration.
#[derive(Clone, Copy, Debug)]
pub(crate) struct RunClock {
    executed_at: DateTime<Utc>,
    started: Instant,
}

impl RunClock {
    pub(crate) fn start() -> Self {
        Self {
            executed_at: Utc::now(),
            started: Instant::now(),
        }
    }

    pub(crate) fn executed_at(&self) -> DateTime<Utc> {
        self.executed_at
    }

    pub(crate) fn elapsed_ms(&self) -> f64 {
        self.started.elapsed().as_secs_f64() * 1_000.0
    }
}

/// Decides which indices of a long series are retained.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Decimator {
    stride: u64,
    capacity: usize,
}

impl Decimator {
    pub(crate) fn new(total: u64, max_points: u64) -> Self {
        let stride = decimation_stride(total, max_points);
        Self {
            stride,
            capacity: (total / stride + 2) as usize,
        }
    }

    #[inline]
    pub(crate) fn keeps(&self, index: u64) -> bool {
        index % self.stride == 0
    }

    pub(crate) fn capacity(&self) -> usize {
        self.capacity
    }
}
