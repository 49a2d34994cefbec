//! Workbook codec for Tarifa.
//!
//! Price lists arrive as spreadsheets. Only the first sheet is read; it is
//! decoded into a [`Grid`](tarifa_types::Grid) with the header as row 0.
//! Grids are written back as single-sheet `.xlsx` workbooks.
//!
//! # Key Types
//!
//! - [`read_workbook`] / [`read_path`] -- first sheet of `.xlsx`, `.xls` or `.ods`
//! - [`write_workbook`] / [`write_path`] -- single-sheet `.xlsx` output
//! - [`export_without_temp`] -- drop the scratch column before export

pub mod error;
pub mod reader;
pub mod writer;

pub use error::{CodecError, CodecResult};
pub use reader::{read_path, read_workbook};
pub use writer::{export_without_temp, write_path, write_workbook, DEFAULT_SHEET_NAME};
