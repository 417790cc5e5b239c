use thiserror::Error;

/// Errors raised at the boundary of an Oslo model run.
///
/// The lattice and relaxation engine never fail once constructed; every
/// variant here comes from construction or from querying run output.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum OsloError {
    #[error("invalid configuration: {reason}")]
    InvalidConfiguration { reason: String },

    #[error("crossover not reached after {steps} steps")]
    CrossoverNotReached { steps: u64 },

    #[error("recurrent phase is empty: crossover at step {crossover_time}, {recorded} steps recorded")]
    EmptyRecurrentPhase { crossover_time: u64, recorded: u64 },

    #[error("history before step {retained_from} was discarded")]
    HistoryDiscarded { retained_from: u64 },
}

impl OsloError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, OsloError>;
