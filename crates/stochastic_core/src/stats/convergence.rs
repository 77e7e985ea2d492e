//! Convergence tracking for running means.
//!
//! A [`ConvergenceTracker`] samples the running mean of a stream at a fixed
//! stride so the whole convergence curve of a million-iteration run fits in
//! a bounded number of points. The series always ends at the last processed
//! observation, even when that observation does not fall on a stride
//! boundary.

use serde::{Deserialize, Serialize};

use super::decimation::decimation_stride;

/// Default maximum number of captured points.
pub const DEFAULT_MAX_POINTS: u64 = 100;

/// Streaming sampler of the running mean.
///
/// # Examples
///
/// ```rust
/// use stochastic_core::stats::ConvergenceTracker;
///
/// let mut tracker = ConvergenceTracker::new(10, 4, 1.0);
/// for i in 1..=10 {
///     tracker.update(i as f64);
/// }
///
/// let series = tracker.finalize();
/// assert_eq!(series.iterations, vec![3, 6, 9, 10]);
/// assert_eq!(series.values.last().copied(), Some(5.5));
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct ConvergenceTracker {
    step: u64,
    multiplier: f64,
    sum: f64,
    count: u64,
    next_capture: u64,
    iterations: Vec<u64>,
    values: Vec<f64>,
}

impl ConvergenceTracker {
    /// Creates a tracker for a run of `total_iterations` observations.
    ///
    /// The stride is `max(1, ⌈total_iterations / max_points⌉)`, which keeps
    /// the series at or below `max_points` entries including the final
    /// point. Each captured mean is multiplied by `multiplier`.
    pub fn new(total_iterations: u64, max_points: u64, multiplier: f64) -> Self {
        let step = decimation_stride(total_iterations, max_points);
        let capacity = (total_iterations / step + 1).min(max_points.max(1) + 1) as usize;

        Self {
            step,
            multiplier,
            sum: 0.0,
            count: 0,
            next_capture: step,
            iterations: Vec::with_capacity(capacity),
            values: Vec::with_capacity(capacity),
        }
    }

    /// Creates a tracker with [`DEFAULT_MAX_POINTS`] and no scaling.
    pub fn with_defaults(total_iterations: u64) -> Self {
        Self::new(total_iterations, DEFAULT_MAX_POINTS, 1.0)
    }

    /// Folds one observation and captures a point on stride boundaries.
    #[inline]
    pub fn update(&mut self, value: f64) {
        self.sum += value;
        self.count += 1;

        if self.count >= self.next_capture {
            self.capture();
            self.next_capture += self.step;
        }
    }

    /// Returns the sampling stride.
    #[inline]
    pub fn step(&self) -> u64 {
        self.step
    }

    /// Returns the number of observations folded in.
    #[inline]
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Returns the scaled running mean, or `0` before the first observation.
    #[inline]
    pub fn running_mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.sum / self.count as f64 * self.multiplier
        }
    }

    /// Produces the captured series, appending the final observation when it
    /// did not land on a stride boundary.
    pub fn finalize(mut self) -> ConvergenceSeries {
        if self.count > 0 && self.iterations.last() != Some(&self.count) {
            self.capture();
        }

        ConvergenceSeries {
            iterations: self.iterations,
            values: self.values,
        }
    }

    fn capture(&mut self) {
        let mean = self.running_mean();
        self.iterations.push(self.count);
        self.values.push(mean);
    }
}

/// Finalised convergence curve as delivered in a simulation result.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ConvergenceSeries {
    /// Iteration number (1-based count) of each captured point.
    pub iterations: Vec<u64>,
    /// Scaled running mean at each captured point.
    pub values: Vec<f64>,
}

impl ConvergenceSeries {
    /// Returns the number of captured points.
    #[inline]
    pub fn len(&self) -> usize {
        self.iterations.len()
    }

    /// Returns `true` when no point was captured.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.iterations.is_empty()
    }
}
