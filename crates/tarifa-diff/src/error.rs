//! Error types for the diff crate.

use std::fmt;

/// Which grid of a comparison an error refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    Subject,
    Reference,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Subject => f.write_str("subject"),
            Self::Reference => f.write_str("reference"),
        }
    }
}

/// Errors that can occur during a comparison.
#[derive(Debug, thiserror::Error)]
pub enum DiffError {
    /// A grid had no rows at all, not even a header.
    #[error("{side} grid has no header row")]
    MissingHeader { side: Side },
}

/// Convenience alias for diff results.
pub type DiffResult<T> = Result<T, DiffError>;
