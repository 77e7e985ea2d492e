//! Stride selection for decimated series.

/// Default cap on the number of points retained for visualisation.
pub const MAX_SAMPLED_POINTS: u64 = 10_000;

/// Returns the stride that keeps at most `max_points` evenly spaced entries
/// out of `total`: `max(1, ⌈total / max_points⌉)`.
///
/// # Examples
///
/// ```rust
/// use stochastic_core::stats::decimation_stride;
///
/// assert_eq!(decimation_stride(500_000, 10_000), 50);
/// assert_eq!(decimation_stride(15_000, 10_000), 2);
/// assert_eq!(decimation_stride(10, 10_000), 1);
/// assert_eq!(decimation_stride(0, 0), 1);
/// ```
#[inline]
pub fn decimation_stride(total: u64, max_points: u64) -> u64 {
    total.div_ceil(max_points.max(1)).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stride_never_exceeds_cap() {
        for total in [1u64, 9_999, 10_000, 10_001, 123_457, 5_000_000] {
            let stride = decimation_stride(total, MAX_SAMPLED_POINTS);
            let kept = total.div_ceil(stride);
            assert!(kept <= MAX_SAMPLED_POINTS, "total={} kept={}", total, kept);
        }
    }
}
