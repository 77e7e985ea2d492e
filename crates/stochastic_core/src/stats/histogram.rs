//! Fixed-bin streaming histogram.
//!
//! Bins are laid out once from an *expected* value range, padded by 10% on
//! each side. Incoming values are bucketed by truncation and clamped into the
//! valid index range, so an outlier never fails and never disappears: it is
//! counted in the nearest boundary bin.

use serde::{Deserialize, Serialize};

/// Default number of bins.
pub const DEFAULT_BIN_COUNT: usize = 30;

/// Fraction of the expected range added as padding on each side.
pub const RANGE_PADDING: f64 = 0.1;

/// Streaming histogram over a fixed set of equal-width bins.
///
/// # Examples
///
/// ```rust
/// use stochastic_core::stats::StreamingHistogram;
///
/// let mut hist = StreamingHistogram::new(0.0, 10.0, 10);
/// for x in [1.0, 5.0, 5.5, 250.0, -40.0] {
///     hist.update(x);
/// }
///
/// let histogram = hist.finalize();
/// assert_eq!(histogram.counts.iter().sum::<u64>(), 5);
/// assert_eq!(histogram.bins[0], "-1.00");
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct StreamingHistogram {
    min_bin: f64,
    bin_width: f64,
    counts: Vec<u64>,
}

impl StreamingHistogram {
    /// Creates a histogram for values expected in `[expected_min, expected_max]`.
    ///
    /// A `bin_count` of zero is treated as one bin. A degenerate or inverted
    /// range is widened to one unit centred on its midpoint so the bin width
    /// is always positive.
    pub fn new(expected_min: f64, expected_max: f64, bin_count: usize) -> Self {
        let bin_count = bin_count.max(1);

        let (mut low, mut high) = (expected_min, expected_max);
        if !(high > low) || !(high - low).is_finite() {
            let centre = if low.is_finite() { low } else { 0.0 };
            low = centre - 0.5;
            high = centre + 0.5;
        }

        let padding = (high - low) * RANGE_PADDING;
        let min_bin = low - padding;
        let max_bin = high + padding;

        Self {
            min_bin,
            bin_width: (max_bin - min_bin) / bin_count as f64,
            counts: vec![0; bin_count],
        }
    }

    /// Creates a histogram with [`DEFAULT_BIN_COUNT`] bins.
    pub fn with_default_bins(expected_min: f64, expected_max: f64) -> Self {
        Self::new(expected_min, expected_max, DEFAULT_BIN_COUNT)
    }

    /// Counts one value.
    #[inline]
    pub fn update(&mut self, value: f64) {
        let last = self.counts.len() - 1;
        // `as` saturates and maps NaN to 0, so the clamp covers every input.
        let raw = ((value - self.min_bin) / self.bin_width).floor() as i64;
        let index = raw.clamp(0, last as i64) as usize;
        self.counts[index] += 1;
    }

    /// Returns the number of values counted so far.
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Returns the number of bins.
    #[inline]
    pub fn bin_count(&self) -> usize {
        self.counts.len()
    }

    /// Returns the width shared by every bin.
    #[inline]
    pub fn bin_width(&self) -> f64 {
        self.bin_width
    }

    /// Produces bin-start labels (two decimals) and the final counts.
    pub fn finalize(&self) -> Histogram {
        let bins = (0..self.counts.len())
            .map(|i| format!("{:.2}", self.min_bin + i as f64 * self.bin_width))
            .collect();

        Histogram {
            bins,
            counts: self.counts.clone(),
        }
    }
}

/// Finalised histogram as delivered in a simulation result.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Histogram {
    /// Bin-start labels formatted with two decimals.
    pub bins: Vec<String>,
    /// Count per bin.
    pub counts: Vec<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    #[test]
    fn test_layout_is_padded() {
        let hist = StreamingHistogram::new(0.0, 100.0, 12);
        assert_eq!(hist.bin_count(), 12);
        assert_relative_eq!(hist.bin_width(), 10.0, epsilon = 1e-12);

        let histogram = hist.finalize();
        assert_eq!(histogram.bins.first().map(String::as_str), Some("-10.00"));
        assert_eq!(histogram.bins.last().map(String::as_str), Some("100.00"));
    }

    #[test]
    fn test_values_land_in_expected_bins() {
        let mut hist = StreamingHistogram::new(0.0, 100.0, 12);
        hist.update(-10.0);
        hist.update(15.0);
        hist.update(15.5);
        hist.update(109.99);

        let counts = hist.finalize().counts;
        assert_eq!(counts[0], 1);
        assert_eq!(counts[2], 2);
        assert_eq!(counts[11], 1);
    }

    #[test]
    fn test_outliers_clamp_to_boundary_bins() {
        let mut hist = StreamingHistogram::new(-1.0, 1.0, 5);
        hist.update(-1.0e12);
        hist.update(1.0e12);
        hist.update(f64::INFINITY);
        hist.update(f64::NEG_INFINITY);

        let counts = hist.finalize().counts;
        assert_eq!(counts[0], 2);
        assert_eq!(counts[4], 2);
        assert_eq!(hist.total(), 4);
    }

    #[test]
    fn test_degenerate_range() {
        let mut hist = StreamingHistogram::new(3.0, 3.0, 4);
        assert!(hist.bin_width() > 0.0);
        hist.update(3.0);
        assert_eq!(hist.total(), 1);

        let zero_bins = StreamingHistogram::new(0.0, 1.0, 0);
        assert_eq!(zero_bins.bin_count(), 1);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        /// Property test: every update is counted exactly once.
        #[test]
        fn prop_counts_are_conserved(
            low in -1.0e3..1.0e3f64,
            width in 0.0..1.0e3f64,
            bins in 1usize..64,
            values in prop::collection::vec(prop::num::f64::ANY, 0..300),
        ) {
            let mut hist = StreamingHistogram::new(low, low + width, bins);
            for &v in &values {
                hist.update(v);
            }
            let histogram = hist.finalize();
            prop_assert_eq!(histogram.counts.iter().sum::<u64>(), values.len() as u64);
            prop_assert_eq!(histogram.bins.len(), bins);
        }
    }
}
