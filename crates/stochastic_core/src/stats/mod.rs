//! Streaming statistics kernels.
//!
//! All kernels use O(1) memory with respect to the number of observations
//! (the histogram and convergence tracker are bounded by their configured
//! sizes), so an engine can fold millions of samples without retaining them.
//!
//! - [`WelfordState`]: running count, mean, variance, min and max
//! - [`StreamingHistogram`]: fixed-bin histogram over an expected range
//! - [`ConvergenceTracker`]: running mean sampled at a fixed stride
//! - [`Statistics`]: the summary reported with each result

mod convergence;
mod decimation;
mod histogram;
mod summary;
mod welford;

pub use convergence::{ConvergenceSeries, ConvergenceTracker, DEFAULT_MAX_POINTS};
pub use decimation::{decimation_stride, MAX_SAMPLED_POINTS};
pub use histogram::{Histogram, StreamingHistogram, DEFAULT_BIN_COUNT, RANGE_PADDING};
pub use summary::{Statistics, Z_95};
pub use welford::{WelfordState, WelfordSummary};
