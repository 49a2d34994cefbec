use std::io::{self, Cursor, Read, Seek};
use std::path::Path;

use calamine::{open_workbook_auto, open_workbook_auto_from_rs, Data, Range, Reader, Sheets};
use tarifa_types::{Cell, Grid, Row};
use tracing::{debug, info};

use crate::error::{CodecError, CodecResult};

/// Decode the first sheet of an in-memory workbook.
pub fn read_workbook(bytes: &[u8]) -> CodecResult<Grid> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))
        .map_err(|e| CodecError::Open(e.to_string()))?;
    let (name, range) = first_sheet(&mut workbook)?;
    Ok(range_to_grid(&name, &range))
}

/// Decode the first sheet of a workbook file.
pub fn read_path(path: impl AsRef<Path>) -> CodecResult<Grid> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(CodecError::Io(io::Error::new(
            io::ErrorKind::NotFound,
            format!("{} not found", path.display()),
        )));
    }
    let mut workbook =
        open_workbook_auto(path).map_err(|e| CodecError::Open(e.to_string()))?;
    let (name, range) = first_sheet(&mut workbook)?;
    info!(path = %path.display(), sheet = %name, "workbook read");
    Ok(range_to_grid(&name, &range))
}

fn first_sheet<RS: Read + Seek>(workbook: &mut Sheets<RS>) -> CodecResult<(String, Range<Data>)> {
    let name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or(CodecError::NoSheets)?;
    let range = workbook
        .worksheet_range(&name)
        .map_err(|e| CodecError::Sheet {
            name: name.clone(),
            reason: e.to_string(),
        })?;
    Ok((name, range))
}

/// Blank rows are dropped; every kept row spans the full sheet width.
fn range_to_grid(sheet: &str, range: &Range<Data>) -> Grid {
    let (height, width) = range.get_size();
    let mut skipped = 0usize;
    let grid: Grid = range
        .rows()
        .filter_map(|cells| {
            let mut row: Row = cells.iter().map(convert_cell).collect();
            if row.iter().all(Cell::is_blank) {
                skipped += 1;
                return None;
            }
            row.resize(width, Cell::Empty);
            Some(row)
        })
        .collect();
    debug!(
        sheet,
        height,
        width,
        rows = grid.len(),
        skipped,
        "sheet decoded"
    );
    grid
}

fn convert_cell(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Empty,
        Data::String(s) => Cell::Text(s.clone()),
        Data::Float(f) => Cell::Number(*f),
        Data::Int(i) => Cell::Number(*i as f64),
        Data::Bool(b) => Cell::text(if *b { "TRUE" } else { "FALSE" }),
        Data::DateTime(dt) => Cell::Text(format_excel_datetime(dt.as_f64())),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::Text(s.clone()),
        Data::Error(e) => Cell::Text(format!("{e:?}")),
    }
}

/// Render an Excel serial date (days since 1899-12-30) as ISO 8601.
fn format_excel_datetime(value: f64) -> String {
    let Some(epoch) = chrono::NaiveDate::from_ymd_opt(1899, 12, 30) else {
        return value.to_string();
    };
    let date = epoch + chrono::Duration::days(value.floor() as i64);
    let seconds = (value.fract() * 86_400.0).round() as u32;
    let time = chrono::NaiveTime::from_num_seconds_from_midnight_opt(seconds.min(86_399), 0)
        .unwrap_or_default();
    let stamp = chrono::NaiveDateTime::new(date, time);
    if seconds == 0 {
        stamp.format("%Y-%m-%d").to_string()
    } else {
        stamp.format("%Y-%m-%dT%H:%M:%S").to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn garbage_bytes_fail_to_open() {
        let err = read_workbook(b"definitely not a workbook").unwrap_err();
        assert!(matches!(err, CodecError::Open(_)));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = read_path("/nonexistent/price-list.xlsx").unwrap_err();
        assert!(matches!(err, CodecError::Io(_)));
    }

    #[test]
    fn cell_conversion() {
        assert_eq!(convert_cell(&Data::Empty), Cell::Empty);
        assert_eq!(convert_cell(&Data::Int(4)), Cell::Number(4.0));
        assert_eq!(convert_cell(&Data::Float(1200.5)), Cell::Number(1200.5));
        assert_eq!(convert_cell(&Data::Bool(true)), Cell::text("TRUE"));
        assert_eq!(
            convert_cell(&Data::String("2024 Unidades".into())),
            Cell::text("2024 Unidades")
        );
    }

    #[test]
    fn serial_dates_render_as_iso() {
        assert_eq!(format_excel_datetime(45292.0), "2024-01-01");
        assert_eq!(format_excel_datetime(45292.5), "2024-01-01T12:00:00");
    }
}
