use thiserror::Error;

/// Errors produced by type operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid cell coordinate {0:?}: expected \"row:col\"")]
    InvalidCoordinate(String),
}
