//! Summary statistics reported with every simulation result.

use serde::{Deserialize, Serialize};

use super::welford::WelfordSummary;

/// Two-sided 95% normal quantile.
pub const Z_95: f64 = 1.96;

/// Summary statistics of a simulated quantity.
///
/// Streaming engines cannot compute an exact median without retaining every
/// sample, so `median` is reported as the mean. This is a known
/// approximation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    /// Sample mean.
    pub mean: f64,
    /// Approximated by the mean.
    pub median: f64,
    /// Population standard deviation.
    pub std_dev: f64,
    /// Population variance.
    pub variance: f64,
    /// Smallest observation.
    pub min: f64,
    /// Largest observation.
    pub max: f64,
    /// Normal-approximation 95% confidence interval of the mean.
    pub confidence_interval95: [f64; 2],
}

impl Statistics {
    /// Builds statistics from a finalised Welford summary.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use stochastic_core::stats::{Statistics, WelfordState};
    ///
    /// let mut state = WelfordState::new();
    /// for x in [1.0, 2.0, 3.0, 4.0] {
    ///     state.update(x);
    /// }
    /// let stats = Statistics::from_summary(&state.finalize());
    /// assert_eq!(stats.median, stats.mean);
    /// assert!(stats.confidence_interval95[0] < 2.5 && 2.5 < stats.confidence_interval95[1]);
    /// ```
    pub fn from_summary(summary: &WelfordSummary) -> Self {
        let half_width = if summary.count > 0 {
            Z_95 * summary.std_dev / (summary.count as f64).sqrt()
        } else {
            0.0
        };

        Self {
            mean: summary.mean,
            median: summary.mean,
            std_dev: summary.std_dev,
            variance: summary.variance,
            min: summary.min,
            max: summary.max,
            confidence_interval95: [summary.mean - half_width, summary.mean + half_width],
        }
    }

    /// Rescales the statistics of `X` into the estimate `k·X`.
    ///
    /// The mean, median, standard deviation and maximum scale by `k`, the
    /// variance by `k²`. `min` stays the observed minimum. The confidence
    /// interval is recomputed from the rescaled standard error; `count` is
    /// the number of observations.
    pub fn scaled(summary: &WelfordSummary, k: f64) -> Self {
        Self::from_summary(&WelfordSummary {
            count: summary.count,
            mean: summary.mean * k,
            variance: summary.variance * k * k,
            std_dev: summary.std_dev * k.abs(),
            min: summary.min,
            max: summary.max * k,
        })
    }

    /// Returns the half-width of the 95% confidence interval.
    #[inline]
    pub fn confidence_half_width(&self) -> f64 {
        (self.confidence_interval95[1] - self.confidence_interval95[0]) / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn summary(count: u64, mean: f64, variance: f64) -> WelfordSummary {
        WelfordSummary {
            count,
            mean,
            variance,
            std_dev: variance.sqrt(),
            min: 0.0,
            max: 1.0,
        }
    }

    #[test]
    fn test_confidence_interval() {
        let stats = Statistics::from_summary(&summary(100, 10.0, 4.0));
        assert_relative_eq!(stats.confidence_interval95[0], 10.0 - 0.392, epsilon = 1e-12);
        assert_relative_eq!(stats.confidence_interval95[1], 10.0 + 0.392, epsilon = 1e-12);
        assert_relative_eq!(stats.confidence_half_width(), 0.392, epsilon = 1e-12);
    }

    #[test]
    fn test_empty_summary_has_degenerate_interval() {
        let stats = Statistics::from_summary(&WelfordSummary::default());
        assert_eq!(stats.confidence_interval95, [0.0, 0.0]);
    }

    #[test]
    fn test_scaled_by_four() {
        let base = summary(400, 0.785, 0.785 * (1.0 - 0.785));
        let stats = Statistics::scaled(&base, 4.0);

        assert_relative_eq!(stats.mean, 3.14, epsilon = 1e-12);
        assert_relative_eq!(stats.variance, base.variance * 16.0, epsilon = 1e-12);
        assert_relative_eq!(stats.std_dev, base.std_dev * 4.0, epsilon = 1e-12);
        assert_eq!(stats.max, 4.0);
        assert_eq!(stats.min, 0.0);
        let expected_half = Z_95 * base.std_dev * 4.0 / 20.0;
        assert_relative_eq!(stats.confidence_half_width(), expected_half, epsilon = 1e-12);
    }

    #[test]
    fn test_scaled_keeps_observed_min() {
        let all_inside = WelfordSummary {
            count: 50,
            mean: 1.0,
            variance: 0.0,
            std_dev: 0.0,
            min: 1.0,
            max: 1.0,
        };
        let stats = Statistics::scaled(&all_inside, 4.0);

        assert_eq!(stats.mean, 4.0);
        assert_eq!(stats.max, 4.0);
        assert_eq!(stats.min, 1.0);
        assert_eq!(stats.confidence_interval95, [4.0, 4.0]);
    }

    #[test]
    fn test_serde_field_names() {
        let json = serde_json::to_value(Statistics::default()).unwrap();
        assert!(json.get("stdDev").is_some());
        assert!(json.get("confidenceInterval95").is_some());
    }
}
