//! Grid preparation for matching: contextual years and scratch columns.
//!
//! This path reads the raw, pre-formatting block labels. It is independent
//! of the transform pipeline and exists only to build identity keys.

use tarifa_types::{cell_at, parse_year_and_note, Cell, Grid, Row, RowType};
use tracing::debug;

use crate::config::DiffConfig;

/// Default header label of the appended contextual-year column.
pub const YEAR_CONTEXT_HEADER: &str = "YearContext";

/// Rows narrower than this carry no version label and are left unstamped.
const MIN_KEYED_WIDTH: usize = 3;

/// Append the contextual year to every data row.
///
/// The year is forward-filled from the most recent type-3 row whose label
/// contains a year; a label without one leaves the previous year in place.
/// While no year has been seen, a type-4 row's own label may seed it. Rows
/// before any year carry `0`. The header gains `header_label`.
///
/// Rows with fewer than three cells are passed through unstamped so they
/// stay unkeyable.
pub fn stamp_year_context(grid: &Grid, header_label: &str) -> Grid {
    let Some(header) = grid.header() else {
        return Grid::new();
    };

    let mut stamped_header = header.clone();
    stamped_header.push(Cell::text(header_label));

    let rows: Vec<Row> = grid
        .data_rows()
        .iter()
        .scan(0i32, |current_year, row| {
            if row.len() < MIN_KEYED_WIDTH {
                debug!(width = row.len(), "row too narrow for a contextual year");
                return Some(row.clone());
            }

            let row_type = RowType::classify(row);
            let seeds_year = match row_type {
                RowType::YearBlock => true,
                RowType::Version => *current_year == 0,
                _ => false,
            };
            if seeds_year {
                let parsed = parse_year_and_note(&cell_at(row, 2).render());
                if parsed.has_year() {
                    *current_year = parsed.year;
                }
            }

            let mut out = row.clone();
            out.push(Cell::from(*current_year));
            Some(out)
        })
        .collect();

    Grid::with_header(stamped_header, rows)
}

/// Drop the first column whose header contains `marker` (case-insensitive).
///
/// Grids without such a column are returned unchanged.
pub fn remove_temp_column(grid: &Grid, marker: &str) -> Grid {
    let marker = marker.to_lowercase();
    match grid.find_column(|name| name.to_lowercase().contains(&marker)) {
        Some(index) => {
            debug!(index, "dropping scratch column");
            grid.without_column(index)
        }
        None => grid.clone(),
    }
}

/// Stamp contextual years, then drop the scratch column.
pub fn prepare_grid(grid: &Grid, config: &DiffConfig) -> Grid {
    let stamped = stamp_year_context(grid, &config.year_header);
    remove_temp_column(&stamped, &config.temp_marker)
}
