use std::time::Duration;

use tarifa_diff::DiffError;

/// Errors a submitted comparison can resolve to.
#[derive(Debug, thiserror::Error)]
pub enum WorkerError {
    /// The comparison did not finish within the configured limit.
    #[error("comparison timed out after {0:?}")]
    Timeout(Duration),

    /// A newer request was submitted before this one finished.
    #[error("comparison {generation} superseded by a newer request")]
    Superseded { generation: u64 },

    /// The comparison panicked.
    #[error("comparison crashed: {0}")]
    Crashed(String),

    /// The diff engine rejected its input.
    #[error(transparent)]
    Diff(#[from] DiffError),
}

/// Result alias for worker operations.
pub type WorkerResult<T> = Result<T, WorkerError>;
