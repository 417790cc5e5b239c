//! Sample moments.

use crate::error::{AnalysisError, Result};

/// A value that can be averaged as a float.
pub trait Sample: Copy {
    fn value(self) -> f64;
}

impl Sample for u32 {
    fn value(self) -> f64 {
        f64::from(self)
    }
}

impl Sample for u64 {
    fn value(self) -> f64 {
        self as f64
    }
}

impl Sample for f64 {
    fn value(self) -> f64 {
        self
    }
}

/// Arithmetic mean.
pub fn mean<T: Sample>(samples: &[T]) -> Result<f64> {
    if samples.is_empty() {
        return Err(AnalysisError::EmptySample);
    }
    Ok(samples.iter().map(|&s| s.value()).sum::<f64>() / samples.len() as f64)
}

/// Population standard deviation (divides by `n`).
pub fn std_dev<T: Sample>(samples: &[T]) -> Result<f64> {
    let mu = mean(samples)?;
    let variance = samples
        .iter()
        .map(|&s| (s.value() - mu).powi(2))
        .sum::<f64>()
        / samples.len() as f64;
    Ok(variance.sqrt())
}

/// `k`-th raw moment, `<s^k>`.
///
/// For avalanche sizes in the recurrent phase `<s^k>` scales as
/// `L^{D(1 + k - τ_s)}`.
pub fn moment<T: Sample>(samples: &[T], k: u32) -> Result<f64> {
    if samples.is_empty() {
        return Err(AnalysisError::EmptySample);
    }
    let exponent = k as i32;
    Ok(samples
        .iter()
        .map(|&s| s.value().powi(exponent))
        .sum::<f64>()
        / samples.len() as f64)
}
