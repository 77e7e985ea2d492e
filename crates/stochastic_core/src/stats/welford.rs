//! Welford's online algorithm for streaming mean and variance.
//!
//! Each update is O(1) in time and memory. Unlike naive sum-of-squares
//! accumulation, the update keeps the running sum of squared deviations
//! (`m2`) relative to the current mean, so variance stays accurate over
//! millions of samples.
//!
//! # Update Rule
//!
//! ```text
//! count += 1
//! delta  = x - mean
//! mean  += delta / count
//! delta2 = x - mean
//! m2    += delta * delta2
//! ```

/// Streaming accumulator for count, mean, variance, minimum and maximum.
///
/// An empty accumulator has `mean = 0`, `m2 = 0`, `min = +∞` and
/// `max = -∞`.
///
/// # Examples
///
/// ```rust
/// use stochastic_core::stats::WelfordState;
///
/// let mut state = WelfordState::new();
/// for x in [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0] {
///     state.update(x);
/// }
///
/// let summary = state.finalize();
/// assert!((summary.mean - 5.0).abs() < 1e-12);
/// assert!((summary.variance - 4.0).abs() < 1e-12);
/// assert!((summary.std_dev - 2.0).abs() < 1e-12);
/// assert_eq!((summary.min, summary.max), (2.0, 9.0));
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WelfordState {
    /// Number of observations folded in.
    pub count: u64,
    /// Running mean.
    pub mean: f64,
    /// Running sum of squared deviations from the mean.
    pub m2: f64,
    /// Smallest observation, `+∞` when empty.
    pub min: f64,
    /// Largest observation, `-∞` when empty.
    pub max: f64,
}

impl WelfordState {
    /// Creates an empty accumulator.
    #[inline]
    pub fn new() -> Self {
        Self {
            count: 0,
            mean: 0.0,
            m2: 0.0,
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
        }
    }

    /// Folds one observation into the accumulator.
    #[inline]
    pub fn update(&mut self, value: f64) {
        self.count += 1;
        let delta = value - self.mean;
        self.mean += delta / self.count as f64;
        let delta2 = value - self.mean;
        self.m2 += delta * delta2;

        if value < self.min {
            self.min = value;
        }
        if value > self.max {
            self.max = value;
        }
    }

    /// Combines two accumulators as if every observation had been folded
    /// into one (Chan et al. parallel update).
    pub fn merge(&self, other: &WelfordState) -> WelfordState {
        if self.count == 0 {
            return *other;
        }
        if other.count == 0 {
            return *self;
        }

        let count = self.count + other.count;
        let n_a = self.count as f64;
        let n_b = other.count as f64;
        let delta = other.mean - self.mean;

        WelfordState {
            count,
            mean: self.mean + delta * n_b / count as f64,
            m2: self.m2 + other.m2 + delta * delta * n_a * n_b / count as f64,
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// Returns the population variance (`m2 / count`), or `0` for fewer than
    /// two observations.
    #[inline]
    pub fn variance(&self) -> f64 {
        if self.count < 2 {
            0.0
        } else {
            self.m2 / self.count as f64
        }
    }

    /// Produces the final summary without consuming the accumulator.
    ///
    /// For an empty accumulator every field of the summary is `0`; the
    /// infinite sentinels never leak into results.
    pub fn finalize(&self) -> WelfordSummary {
        if self.count == 0 {
            return WelfordSummary::default();
        }

        let variance = self.variance();
        WelfordSummary {
            count: self.count,
            mean: self.mean,
            variance,
            std_dev: variance.sqrt(),
            min: self.min,
            max: self.max,
        }
    }
}

impl Default for WelfordState {
    fn default() -> Self {
        Self::new()
    }
}

/// Finalised output of a [`WelfordState`].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct WelfordSummary {
    /// Number of observations.
    pub count: u64,
    /// Sample mean.
    pub mean: f64,
    /// Population variance.
    pub variance: f64,
    /// Population standard deviation.
    pub std_dev: f64,
    /// Smallest observation.
    pub min: f64,
    /// Largest observation.
    pub max: f64,
}
