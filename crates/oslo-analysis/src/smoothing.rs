//! Temporal smoothing of the height series and its scaling collapse.
//!
//! Single runs show large height fluctuations around the average
//! trajectory. A centred moving average over `2w + 1` samples recovers the
//! smooth curve `h̃(t; L)`, and plotting `h̃ / L` against `t / L²` collapses
//! all system sizes onto one curve.

use crate::moments::Sample;

/// Centred moving average of width `2 * half_width + 1`.
///
/// Samples beyond either end count as zero and the window is always
/// divided by its full width, so the first `half_width` values are biased
/// low. The last `half_width` values would be equally biased and are
/// dropped.
///
/// # Returns
/// `heights.len() - half_width` smoothed values (empty if that is negative)
pub fn moving_average<T: Sample>(heights: &[T], half_width: usize) -> Vec<f64> {
    let n = heights.len();
    let width = (2 * half_width + 1) as f64;

    let mut prefix = Vec::with_capacity(n + 1);
    prefix.push(0.0);
    for &h in heights {
        let last = prefix[prefix.len() - 1];
        prefix.push(last + h.value());
    }

    (0..n.saturating_sub(half_width))
        .map(|t| {
            let lo = t.saturating_sub(half_width);
            let hi = (t + half_width + 1).min(n);
            (prefix[hi] - prefix[lo]) / width
        })
        .collect()
}

/// Pairs `(t / L², h / L)` for a height series.
pub fn collapse_heights(heights: &[f64], system_size: usize) -> Vec<(f64, f64)> {
    let l = system_size as f64;
    heights
        .iter()
        .enumerate()
        .map(|(t, &h)| (t as f64 / (l * l), h / l))
        .collect()
}
