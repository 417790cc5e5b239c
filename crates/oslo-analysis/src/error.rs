use oslo::OsloError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalysisError {
    #[error("no samples to analyse")]
    EmptySample,

    #[error("log-bin scale must be finite and at least 1, got {scale}")]
    InvalidScale { scale: f64 },

    #[error("log-bin scale {scale} needs more than {max_bins} bins to cover the sample")]
    TooManyBins { scale: f64, max_bins: usize },

    #[error("run output unavailable: {0}")]
    Run(#[from] OsloError),
}

pub type Result<T> = std::result::Result<T, AnalysisError>;
