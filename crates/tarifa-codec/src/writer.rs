use std::path::Path;

use rust_xlsxwriter::{Workbook, Worksheet};
use tarifa_types::{Cell, Grid};
use tracing::{debug, info};

use crate::error::CodecResult;

/// Sheet name used when the caller has no preference.
pub const DEFAULT_SHEET_NAME: &str = "Sheet1";

/// Widths of the type, class, version and two price columns.
const LEADING_WIDTHS: [f64; 5] = [8.0, 15.0, 40.0, 15.0, 15.0];
const TRAILING_WIDTH: f64 = 12.0;

/// Header label of the scratch column dropped on export.
const TEMP_HEADER: &str = "temp";

fn fill_worksheet(worksheet: &mut Worksheet, grid: &Grid) -> CodecResult<()> {
    for col in 0..grid.width() {
        let width = LEADING_WIDTHS.get(col).copied().unwrap_or(TRAILING_WIDTH);
        worksheet.set_column_width(col as u16, width)?;
    }
    for (r, row) in grid.rows().iter().enumerate() {
        for (c, cell) in row.iter().enumerate() {
            let (r, c) = (r as u32, c as u16);
            match cell {
                Cell::Number(n) if n.is_finite() => {
                    worksheet.write_number(r, c, *n)?;
                }
                Cell::Number(n) => {
                    worksheet.write_string(r, c, cell.render())?;
                    debug!(row = r, col = c, value = %n, "non-finite number written as text");
                }
                Cell::Text(s) => {
                    worksheet.write_string(r, c, s)?;
                }
                Cell::Empty => {}
            }
        }
    }
    Ok(())
}

/// Encode `grid` as a single-sheet `.xlsx` workbook.
///
/// Numbers are written as numbers, text as strings; empty cells are left
/// unwritten.
pub fn write_workbook(grid: &Grid, sheet_name: &str) -> CodecResult<Vec<u8>> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(sheet_name)?;
    fill_worksheet(worksheet, grid)?;
    let bytes = workbook.save_to_buffer()?;
    debug!(rows = grid.len(), bytes = bytes.len(), "workbook encoded");
    Ok(bytes)
}

/// Encode `grid` and write it to `path`.
pub fn write_path(grid: &Grid, sheet_name: &str, path: impl AsRef<Path>) -> CodecResult<()> {
    let path = path.as_ref();
    let bytes = write_workbook(grid, sheet_name)?;
    std::fs::write(path, bytes)?;
    info!(path = %path.display(), rows = grid.len(), "workbook written");
    Ok(())
}

/// Drop the column whose header is exactly `Temp` (any case).
///
/// Unlike diff preparation, which drops any column whose header merely
/// contains the marker, export only removes an exact match.
pub fn export_without_temp(grid: &Grid) -> Grid {
    match grid.find_column(|name| name.trim().eq_ignore_ascii_case(TEMP_HEADER)) {
        Some(index) => grid.without_column(index),
        None => grid.clone(),
    }
}
