//! Probability distributions and their samplers.
//!
//! - [`DistributionParams`]: the serialisable tagged union of supported
//!   distributions, with validation, analytical moments and histogram ranges
//! - Free sampler functions for one variate per call
//! - [`DistributionSampler`]: a validated [`rand_distr::Distribution`] for
//!   engine hot loops

mod params;
mod samplers;

pub use params::{DistributionParams, MAX_BINOMIAL_TRIALS};
pub use samplers::{
    binomial_sample, exponential_sample, normal_sample, poisson_sample, uniform_range_sample,
    uniform_sample, DistributionSampler, BINOMIAL_DIRECT_LIMIT, BINOMIAL_NORMAL_MIN_EXPECTED,
    LOG_EPSILON, POISSON_KNUTH_LIMIT,
};
