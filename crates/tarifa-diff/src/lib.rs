//! Diff engine for Tarifa.
//!
//! Matches rows of a subject grid to rows of a reference grid by business
//! identity rather than position, then compares a fixed span of columns.
//!
//! # Key Types
//!
//! - [`prepare_grid`] -- stamps the contextual year and drops the Temp column
//! - [`RowKey`] -- `type|year|version` identity with a year-agnostic fallback
//! - [`ReferenceIndex`] -- full-key and fallback-key lookup over the reference
//! - [`compare`] / [`Comparison`] -- differing cells plus per-row match status

pub mod config;
pub mod context;
pub mod engine;
pub mod error;
pub mod key;

pub use config::DiffConfig;
pub use context::{prepare_grid, remove_temp_column, stamp_year_context, YEAR_CONTEXT_HEADER};
pub use engine::{compare, compare_grids, Comparison, ComparisonSummary, ReferenceIndex, RowMatch};
pub use error::{DiffError, DiffResult, Side};
pub use key::{fallback_key, RowKey, INVALID_KEY, YEAR_FALLBACK_TOKEN};
