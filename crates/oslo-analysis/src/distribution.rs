//! Empirical probability distributions.
//!
//! Avalanche sizes span many decades, so their distribution is estimated
//! with logarithmic bins: bin `j` covers the integers in
//! `[⌊a^j⌋, ⌊a^{j+1}⌋)` for a scale `a > 1`. Each bin's count is divided
//! by its integer width and by the number of samples, giving a density
//! that is directly comparable with the raw frequency `P(s)`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{AnalysisError, Result};

/// Empirical probability of each observed value.
///
/// # Errors
/// `EmptySample` if `samples` is empty.
pub fn probability<T: Copy + Ord>(samples: &[T]) -> Result<BTreeMap<T, f64>> {
    if samples.is_empty() {
        return Err(AnalysisError::EmptySample);
    }
    let mut counts: BTreeMap<T, u64> = BTreeMap::new();
    for &s in samples {
        *counts.entry(s).or_default() += 1;
    }
    let n = samples.len() as f64;
    Ok(counts
        .into_iter()
        .map(|(value, count)| (value, count as f64 / n))
        .collect())
}

/// One logarithmic bin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LogBin {
    /// Smallest integer in the bin
    pub lower: u64,
    /// One past the largest integer in the bin
    pub upper: u64,
    /// Geometric mean of the smallest and largest integer in the bin
    pub centre: f64,
    /// Probability per unit size
    pub density: f64,
}

impl LogBin {
    pub fn width(&self) -> u64 {
        self.upper - self.lower
    }
}

/// Largest number of bin edges `log_bin` will generate.
pub const MAX_BINS: usize = 1 << 20;

/// Log-binned probability density of `samples`.
///
/// # Arguments
/// * `samples` - Avalanche sizes (or any non-negative integers)
/// * `scale` - Ratio between successive bin edges; 1 gives unit bins
/// * `include_zeros` - Keep zero-valued samples in a bin `[0, 1)`. When
///   false they are removed before normalising
///
/// Samples equal to `u64::MAX` lie beyond the last representable edge and
/// are ignored.
///
/// # Returns
/// Non-empty bins in increasing order
///
/// # Errors
/// * `InvalidScale` if `scale < 1` or is not finite
/// * `TooManyBins` if covering the largest sample needs more than
///   [`MAX_BINS`] edges
/// * `EmptySample` if nothing is left to bin
pub fn log_bin(samples: &[u64], scale: f64, include_zeros: bool) -> Result<Vec<LogBin>> {
    if !scale.is_finite() || scale < 1.0 {
        return Err(AnalysisError::InvalidScale { scale });
    }

    let mut counts: BTreeMap<u64, u64> = BTreeMap::new();
    let mut total = 0u64;
    for &s in samples {
        if (include_zeros || s > 0) && s < u64::MAX {
            *counts.entry(s).or_default() += 1;
            total += 1;
        }
    }
    let Some((&max, _)) = counts.last_key_value() else {
        return Err(AnalysisError::EmptySample);
    };

    let edges = bin_edges(max, scale, include_zeros)?;
    let total = total as f64;
    Ok(edges
        .windows(2)
        .filter_map(|pair| {
            let (lower, upper) = (pair[0], pair[1]);
            let count: u64 = counts.range(lower..upper).map(|(_, &c)| c).sum();
            if count == 0 {
                return None;
            }
            let width = (upper - lower) as f64;
            Some(LogBin {
                lower,
                upper,
                centre: (lower as f64 * (upper - 1) as f64).sqrt(),
                density: count as f64 / width / total,
            })
        })
        .collect())
}

/// Integer bin edges up to and including the first edge above `max`.
fn bin_edges(max: u64, scale: f64, include_zeros: bool) -> Result<Vec<u64>> {
    let mut edges = if include_zeros { vec![0] } else { Vec::new() };
    let mut edge = 1u64;
    loop {
        edges.push(edge);
        if edge > max {
            return Ok(edges);
        }
        if edges.len() >= MAX_BINS {
            return Err(AnalysisError::TooManyBins {
                scale,
                max_bins: MAX_BINS,
            });
        }
        edge = next_edge(edge, scale);
    }
}

/// Smallest `⌊scale^j⌋` strictly above `last`.
fn next_edge(last: u64, scale: f64) -> u64 {
    if scale == 1.0 {
        return last.saturating_add(1);
    }

    // Start from the j the logarithm suggests; rounding can leave it one
    // step high or, near the top of the u64 range, too low.
    let target = last as f64 + 1.0;
    let mut exponent = (target.ln() / scale.ln()).ceil();
    if exponent > 0.0 && scale.powf(exponent - 1.0) >= target {
        exponent -= 1.0;
    }
    // `as` saturates, so huge powers land on u64::MAX and end the search.
    let mut edge = scale.powf(exponent).floor() as u64;
    while edge <= last {
        exponent += 1.0;
        edge = scale.powf(exponent).floor() as u64;
    }
    edge
}

/// Data-collapse transform of a binned distribution.
///
/// With the finite-size scaling ansatz `P(s; L) ~ s^{-τ_s} G(s / L^D)`,
/// plotting `s^{τ_s} P` against `s / L^D` puts every system size on the
/// same curve.
///
/// # Returns
/// `(centre / L^D, density * centre^τ_s)` per bin
pub fn collapse(
    bins: &[LogBin],
    system_size: usize,
    dimension: f64,
    tau_s: f64,
) -> Vec<(f64, f64)> {
    let cutoff = (system_size as f64).powf(dimension);
    bins.iter()
        .map(|bin| (bin.centre / cutoff, bin.density * bin.centre.powf(tau_s)))
        .collect()
}
