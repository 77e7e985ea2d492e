//! Distribution parameter definitions.
//!
//! [`DistributionParams`] is the tagged union a caller uses to pick the
//! distribution a Monte Carlo run or a random walk draws from. Its serialised
//! form mirrors the Stochastic Lab request payload:
//!
//! ```json
//! { "type": "normal", "params": { "mean": 0.0, "stdDev": 1.0 } }
//! ```

use serde::{Deserialize, Serialize};

use crate::error::SimulationError;

/// Number of standard deviations covered by the expected histogram range.
const RANGE_SIGMAS: f64 = 4.0;

/// Largest binomial trial count accepted.
///
/// Small success probabilities fall back to the Bernoulli sum, which costs
/// one uniform per trial, so `n` bounds the work done inside a single draw.
pub const MAX_BINOMIAL_TRIALS: i64 = 1_000_000;

/// Parameters of a supported probability distribution.
///
/// # Examples
///
/// ```rust
/// use stochastic_core::distributions::DistributionParams;
///
/// let params = DistributionParams::normal(10.0, 2.0);
/// assert!(params.validate().is_ok());
/// assert_eq!(params.mean(), 10.0);
/// assert_eq!(params.variance(), 4.0);
///
/// let (low, high) = params.expected_range();
/// assert_eq!((low, high), (2.0, 18.0));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "params", rename_all = "lowercase")]
pub enum DistributionParams {
    /// Gaussian distribution.
    Normal {
        /// Location parameter.
        mean: f64,
        /// Scale parameter (standard deviation).
        #[serde(rename = "stdDev")]
        std_dev: f64,
    },
    /// Poisson distribution over event counts.
    Poisson {
        /// Rate (expected count), strictly positive.
        lambda: f64,
    },
    /// Exponential distribution over waiting times.
    Exponential {
        /// Rate, strictly positive.
        lambda: f64,
    },
    /// Binomial distribution over successes in `n` trials.
    Binomial {
        /// Number of trials, non-negative.
        n: i64,
        /// Success probability in `[0, 1]`.
        p: f64,
    },
}

impl DistributionParams {
    /// Creates normal distribution parameters.
    #[inline]
    pub fn normal(mean: f64, std_dev: f64) -> Self {
        Self::Normal { mean, std_dev }
    }

    /// Creates Poisson distribution parameters.
    #[inline]
    pub fn poisson(lambda: f64) -> Self {
        Self::Poisson { lambda }
    }

    /// Creates exponential distribution parameters.
    #[inline]
    pub fn exponential(lambda: f64) -> Self {
        Self::Exponential { lambda }
    }

    /// Creates binomial distribution parameters.
    #[inline]
    pub fn binomial(n: i64, p: f64) -> Self {
        Self::Binomial { n, p }
    }

    /// Returns the lowercase distribution name used in payloads.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Normal { .. } => "normal",
            Self::Poisson { .. } => "poisson",
            Self::Exponential { .. } => "exponential",
            Self::Binomial { .. } => "binomial",
        }
    }

    /// Validates the parameters.
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::InvalidDistribution`] if:
    /// - any parameter is NaN or infinite
    /// - `stdDev` is negative (normal; zero is accepted as degenerate)
    /// - `lambda <= 0` (poisson, exponential)
    /// - `n < 0` or `p` outside `[0, 1]` (binomial)
    pub fn validate(&self) -> Result<(), SimulationError> {
        match *self {
            Self::Normal { mean, std_dev } => {
                check_finite("mean", mean)?;
                check_finite("stdDev", std_dev)?;
                if std_dev < 0.0 {
                    return Err(SimulationError::invalid_distribution(
                        "stdDev",
                        format!("must be non-negative, got {}", std_dev),
                    ));
                }
                Ok(())
            }
            Self::Poisson { lambda } | Self::Exponential { lambda } => check_rate(lambda),
            Self::Binomial { n, p } => check_binomial(n, p),
        }
    }

    /// Returns the analytical mean of the distribution.
    pub fn mean(&self) -> f64 {
        match *self {
            Self::Normal { mean, .. } => mean,
            Self::Poisson { lambda } => lambda,
            Self::Exponential { lambda } => 1.0 / lambda,
            Self::Binomial { n, p } => n as f64 * p,
        }
    }

    /// Returns the analytical variance of the distribution.
    pub fn variance(&self) -> f64 {
        match *self {
            Self::Normal { std_dev, .. } => std_dev * std_dev,
            Self::Poisson { lambda } => lambda,
            Self::Exponential { lambda } => 1.0 / (lambda * lambda),
            Self::Binomial { n, p } => n as f64 * p * (1.0 - p),
        }
    }

    /// Returns `E[X²]`, i.e. variance plus squared mean.
    #[inline]
    pub fn second_moment(&self) -> f64 {
        let mean = self.mean();
        self.variance() + mean * mean
    }

    /// Returns the heuristic `(min, max)` range used to lay out histogram bins.
    ///
    /// | Distribution | Range |
    /// |--------------|-------|
    /// | normal | `mean ± 4·stdDev` |
    /// | exponential | `[0, 5/λ]` |
    /// | poisson | `[0, λ + 4·√λ]` |
    /// | binomial | `[0, n]` |
    ///
    /// These are not hard bounds: values outside the range are clamped into
    /// the boundary bins by the histogram.
    pub fn expected_range(&self) -> (f64, f64) {
        match *self {
            Self::Normal { mean, std_dev } => {
                (mean - RANGE_SIGMAS * std_dev, mean + RANGE_SIGMAS * std_dev)
            }
            Self::Exponential { lambda } => (0.0, 5.0 / lambda),
            Self::Poisson { lambda } => (0.0, lambda + RANGE_SIGMAS * lambda.sqrt()),
            Self::Binomial { n, .. } => (0.0, n as f64),
        }
    }
}

fn check_finite(name: &'static str, value: f64) -> Result<(), SimulationError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(SimulationError::invalid_distribution(
            name,
            format!("must be finite, got {}", value),
        ))
    }
}

/// Rejects non-positive or non-finite rates.
pub(crate) fn check_rate(lambda: f64) -> Result<(), SimulationError> {
    check_finite("lambda", lambda)?;
    if lambda <= 0.0 {
        return Err(SimulationError::invalid_distribution(
            "lambda",
            format!("must be positive, got {}", lambda),
        ));
    }
    Ok(())
}

/// Rejects trial counts outside `[0, MAX_BINOMIAL_TRIALS]` and probabilities
/// outside `[0, 1]`.
pub(crate) fn check_binomial(n: i64, p: f64) -> Result<(), SimulationError> {
    if n < 0 {
        return Err(SimulationError::invalid_distribution(
            "n",
            format!("must be a non-negative integer, got {}", n),
        ));
    }
    if n > MAX_BINOMIAL_TRIALS {
        return Err(SimulationError::invalid_distribution(
            "n",
            format!("must be at most {}, got {}", MAX_BINOMIAL_TRIALS, n),
        ));
    }
    if !(0.0..=1.0).contains(&p) {
        return Err(SimulationError::invalid_distribution(
            "p",
            format!("must be in [0, 1], got {}", p),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_validate_accepts_valid_params() {
        assert!(DistributionParams::normal(0.0, 1.0).validate().is_ok());
        assert!(DistributionParams::normal(5.0, 0.0).validate().is_ok());
        assert!(DistributionParams::poisson(3.5).validate().is_ok());
        assert!(DistributionParams::exponential(0.1).validate().is_ok());
        assert!(DistributionParams::binomial(0, 0.0).validate().is_ok());
        assert!(DistributionParams::binomial(20, 1.0).validate().is_ok());
        assert!(DistributionParams::binomial(MAX_BINOMIAL_TRIALS, 1e-9).validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_invalid_params() {
        let cases = [
            (DistributionParams::normal(0.0, -1.0), "stdDev"),
            (DistributionParams::normal(f64::NAN, 1.0), "mean"),
            (DistributionParams::poisson(0.0), "lambda"),
            (DistributionParams::exponential(-2.0), "lambda"),
            (DistributionParams::exponential(f64::INFINITY), "lambda"),
            (DistributionParams::binomial(-1, 0.5), "n"),
            (DistributionParams::binomial(MAX_BINOMIAL_TRIALS + 1, 0.5), "n"),
            (DistributionParams::binomial(3_000_000_000, 1e-9), "n"),
            (DistributionParams::binomial(10, 1.5), "p"),
            (DistributionParams::binomial(10, f64::NAN), "p"),
        ];

        for (params, expected) in cases {
            match params.validate() {
                Err(SimulationError::InvalidDistribution { name, .. }) => {
                    assert_eq!(name, expected, "wrong parameter flagged for {:?}", params)
                }
                other => panic!("expected validation error for {:?}, got {:?}", params, other),
            }
        }
    }

    #[test]
    fn test_moments() {
        assert_relative_eq!(DistributionParams::exponential(2.0).mean(), 0.5);
        assert_relative_eq!(DistributionParams::exponential(2.0).variance(), 0.25);
        assert_relative_eq!(DistributionParams::binomial(10, 0.3).mean(), 3.0);
        assert_relative_eq!(DistributionParams::binomial(10, 0.3).variance(), 2.1, epsilon = 1e-12);
        assert_relative_eq!(DistributionParams::normal(1.0, 2.0).second_moment(), 5.0);
    }

    #[test]
    fn test_expected_ranges() {
        assert_eq!(DistributionParams::exponential(0.5).expected_range(), (0.0, 10.0));
        assert_eq!(DistributionParams::poisson(4.0).expected_range(), (0.0, 12.0));
        assert_eq!(DistributionParams::binomial(25, 0.5).expected_range(), (0.0, 25.0));
    }

    #[test]
    fn test_serde_shape() {
        let params = DistributionParams::normal(1.0, 0.5);
        let json = serde_json::to_value(params).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"type": "normal", "params": {"mean": 1.0, "stdDev": 0.5}})
        );

        let parsed: DistributionParams =
            serde_json::from_str(r#"{"type":"binomial","params":{"n":12,"p":0.25}}"#).unwrap();
        assert_eq!(parsed, DistributionParams::binomial(12, 0.25));
    }

    #[test]
    fn test_serde_rejects_non_integer_trials() {
        let parsed: Result<DistributionParams, _> =
            serde_json::from_str(r#"{"type":"binomial","params":{"n":2.5,"p":0.25}}"#);
        assert!(parsed.is_err());
    }
}
