//! Single-variate samplers for the supported distributions.
//!
//! Each sampler is a pure function of its parameters and an explicitly
//! injected generator. Samplers whose parameters have a hard domain
//! (exponential, Poisson, binomial) validate before drawing and return a
//! [`SimulationError`] instead of producing `NaN`.
//!
//! For the hot loop of an engine, [`DistributionSampler`] validates once at
//! construction and then implements [`Distribution<f64>`] without further
//! checks.
//!
//! # Algorithms
//!
//! | Sampler | Method |
//! |---------|--------|
//! | normal | Box-Muller (first uniform floored at `1e-10`) |
//! | exponential | inverse CDF, `-ln(U)/λ` |
//! | poisson | Knuth multiplication for `λ ≤ 30`, rounded normal above |
//! | binomial | Bernoulli sum for `n ≤ 100` or when the normal approximation is invalid |

use std::f64::consts::PI;

use rand::Rng;
use rand_distr::Distribution;

use super::params::{check_binomial, check_rate, DistributionParams};
use crate::error::SimulationError;

/// Floor applied to uniforms before taking a logarithm.
pub const LOG_EPSILON: f64 = 1e-10;

/// Largest rate sampled with Knuth's multiplication algorithm.
pub const POISSON_KNUTH_LIMIT: f64 = 30.0;

/// Largest trial count always sampled by direct Bernoulli simulation.
pub const BINOMIAL_DIRECT_LIMIT: i64 = 100;

/// Minimum `n·p` and `n·(1-p)` for the binomial normal approximation.
pub const BINOMIAL_NORMAL_MIN_EXPECTED: f64 = 10.0;

/// Draws a uniform variate in `[0, 1)`.
#[inline]
pub fn uniform_sample<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    rng.gen::<f64>()
}

/// Draws a uniform variate in `[low, high)`.
#[inline]
pub fn uniform_range_sample<R: Rng + ?Sized>(rng: &mut R, low: f64, high: f64) -> f64 {
    low + (high - low) * uniform_sample(rng)
}

/// Draws a normal variate via the Box-Muller transform.
///
/// `std_dev` is not validated here; a negative value mirrors the variate
/// around `mean`. Use [`DistributionSampler`] for validated sampling.
///
/// # Examples
///
/// ```rust
/// use stochastic_core::distributions::normal_sample;
/// use stochastic_core::rng::LabRng;
///
/// let mut rng = LabRng::from_seed(42);
/// let x = normal_sample(&mut rng, 100.0, 0.0);
/// assert_eq!(x, 100.0);
/// ```
#[inline]
pub fn normal_sample<R: Rng + ?Sized>(rng: &mut R, mean: f64, std_dev: f64) -> f64 {
    let u1 = uniform_sample(rng).max(LOG_EPSILON);
    let u2 = uniform_sample(rng);
    let z = (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos();
    mean + std_dev * z
}

/// Draws an exponential variate by inverting the CDF.
///
/// # Errors
///
/// Returns [`SimulationError::InvalidDistribution`] if `lambda <= 0` or is not finite.
pub fn exponential_sample<R: Rng + ?Sized>(rng: &mut R, lambda: f64) -> Result<f64, SimulationError> {
    check_rate(lambda)?;
    Ok(exponential_unchecked(rng, lambda))
}

/// Draws a Poisson variate.
///
/// # Errors
///
/// Returns [`SimulationError::InvalidDistribution`] if `lambda <= 0` or is not finite.
pub fn poisson_sample<R: Rng + ?Sized>(rng: &mut R, lambda: f64) -> Result<f64, SimulationError> {
    check_rate(lambda)?;
    Ok(poisson_unchecked(rng, lambda))
}

/// Draws a binomial variate.
///
/// # Errors
///
/// Returns [`SimulationError::InvalidDistribution`] if `n` is outside
/// `[0, MAX_BINOMIAL_TRIALS]` or `p` is outside `[0, 1]`.
pub fn binomial_sample<R: Rng + ?Sized>(rng: &mut R, n: i64, p: f64) -> Result<f64, SimulationError> {
    check_binomial(n, p)?;
    Ok(binomial_unchecked(rng, n, p))
}

#[inline]
fn exponential_unchecked<R: Rng + ?Sized>(rng: &mut R, lambda: f64) -> f64 {
    let u = uniform_sample(rng).max(LOG_EPSILON);
    -u.ln() / lambda
}

fn poisson_unchecked<R: Rng + ?Sized>(rng: &mut R, lambda: f64) -> f64 {
    if lambda > POISSON_KNUTH_LIMIT {
        // The product of uniforms underflows towards exp(-λ) for large rates.
        return normal_sample(rng, lambda, lambda.sqrt()).round().max(0.0);
    }

    let threshold = (-lambda).exp();
    let mut k = 0u64;
    let mut product = 1.0;
    loop {
        k += 1;
        product *= uniform_sample(rng);
        if product <= threshold {
            break;
        }
    }
    (k - 1) as f64
}

fn binomial_unchecked<R: Rng + ?Sized>(rng: &mut R, n: i64, p: f64) -> f64 {
    let trials = n as f64;
    let use_normal = n > BINOMIAL_DIRECT_LIMIT
        && trials * p > BINOMIAL_NORMAL_MIN_EXPECTED
        && trials * (1.0 - p) > BINOMIAL_NORMAL_MIN_EXPECTED;

    if use_normal {
        let mean = trials * p;
        let std_dev = (trials * p * (1.0 - p)).sqrt();
        return normal_sample(rng, mean, std_dev).round().clamp(0.0, trials);
    }

    let mut successes = 0u64;
    for _ in 0..n {
        if uniform_sample(rng) < p {
            successes += 1;
        }
    }
    successes as f64
}

/// Validated sampler for a [`DistributionParams`] value.
///
/// Construction performs all parameter checks, so drawing never fails.
///
/// # Examples
///
/// ```rust
/// use rand_distr::Distribution;
/// use stochastic_core::distributions::{DistributionParams, DistributionSampler};
/// use stochastic_core::rng::LabRng;
///
/// let sampler = DistributionSampler::new(DistributionParams::poisson(4.0)).unwrap();
/// let mut rng = LabRng::from_seed(1);
/// let k = sampler.sample(&mut rng);
/// assert!(k >= 0.0 && k.fract() == 0.0);
///
/// assert!(DistributionSampler::new(DistributionParams::exponential(0.0)).is_err());
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DistributionSampler {
    params: DistributionParams,
}

impl DistributionSampler {
    /// Creates a sampler after validating `params`.
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::InvalidDistribution`] for out-of-domain parameters.
    pub fn new(params: DistributionParams) -> Result<Self, SimulationError> {
        params.validate()?;
        Ok(Self { params })
    }

    /// Returns the validated parameters.
    #[inline]
    pub fn params(&self) -> &DistributionParams {
        &self.params
    }
}

impl Distribution<f64> for DistributionSampler {
    #[inline]
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        match self.params {
            DistributionParams::Normal { mean, std_dev } => normal_sample(rng, mean, std_dev),
            DistributionParams::Poisson { lambda } => poisson_unchecked(rng, lambda),
            DistributionParams::Exponential { lambda } => exponential_unchecked(rng, lambda),
            DistributionParams::Binomial { n, p } => binomial_unchecked(rng, n, p),
        }
    }
}
