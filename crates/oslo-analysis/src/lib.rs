//! Statistics over Oslo model time series.
//!
//! Everything here consumes the slices a finished run exposes; nothing
//! feeds back into the engine. Fitting and plotting are left to callers.

pub mod distribution;
pub mod ensemble;
pub mod error;
pub mod moments;
pub mod smoothing;


pub use distribution::{LogBin, MAX_BINS, collapse, log_bin, probability};
pub use ensemble::{CrossoverSummary, Ensemble, Summary, summarise_crossover};
pub use error::{AnalysisError, Result};
pub use moments::{Sample, mean, moment, std_dev};
pub use smoothing::{collapse_heights, moving_average};
