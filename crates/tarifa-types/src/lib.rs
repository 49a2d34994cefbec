//! Foundation types for Tarifa, the price list reconciler.
//!
//! Every other Tarifa crate depends on `tarifa-types`. All loose cell
//! coercion lives here so the transform and diff crates never re-implement
//! ad-hoc number/string conversion.
//!
//! # Key Types
//!
//! - [`Cell`]: untyped scalar (empty, number, or text) with the canonical [`normalize_cell`]
//! - [`Grid`] / [`Row`]: header row followed by data rows
//! - [`RowType`]: row discriminator read from column 0
//! - [`YearNote`] / [`Condition`]: year and condition extracted from a free-text label
//! - [`CellCoord`]: `"row:col"` coordinate of a differing cell

pub mod cell;
pub mod coord;
pub mod error;
pub mod grid;
pub mod row_type;
pub mod year;

pub use cell::{collapse_whitespace, format_number, normalize_cell, normalize_str, Cell};
pub use coord::CellCoord;
pub use error::TypeError;
pub use grid::{cell_at, row, Grid, Row};
pub use row_type::RowType;
pub use year::{parse_year_and_note, Condition, YearNote};
