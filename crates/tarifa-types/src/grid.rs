//! Grids: a header row followed by data rows.

use serde::{Deserialize, Serialize};

use crate::cell::Cell;

/// A single spreadsheet row.
pub type Row = Vec<Cell>;

static EMPTY_CELL: Cell = Cell::Empty;

/// Build a row from anything convertible into cells.
///
/// ```
/// use tarifa_types::{row, Cell};
/// let r = row([Cell::from(4), Cell::text("Trim 1")]);
/// assert_eq!(r.len(), 2);
/// ```
pub fn row<I, T>(cells: I) -> Row
where
    I: IntoIterator<Item = T>,
    T: Into<Cell>,
{
    cells.into_iter().map(Into::into).collect()
}

/// Cell `col` of a row, or an empty cell when the row is too short.
pub fn cell_at(row: &[Cell], col: usize) -> &Cell {
    row.get(col).unwrap_or(&EMPTY_CELL)
}

/// An ordered sequence of rows. Row 0 is the header when present.
///
/// Rows may be shorter than the header; [`Grid::cell`] pads them with empty
/// cells on read.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Grid {
    rows: Vec<Row>,
}

impl Grid {
    /// Create an empty grid (no header).
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_rows(rows: Vec<Row>) -> Self {
        Self { rows }
    }

    /// Assemble a grid from a header and data rows.
    pub fn with_header(header: Row, data: Vec<Row>) -> Self {
        let mut rows = Vec::with_capacity(data.len() + 1);
        rows.push(header);
        rows.extend(data);
        Self { rows }
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<Row> {
        self.rows
    }

    pub fn header(&self) -> Option<&Row> {
        self.rows.first()
    }

    /// Every row after the header.
    pub fn data_rows(&self) -> &[Row] {
        self.rows.get(1..).unwrap_or(&[])
    }

    /// Split into `(header, data rows)`.
    pub fn split_header(self) -> Option<(Row, Vec<Row>)> {
        let mut rows = self.rows.into_iter();
        let header = rows.next()?;
        Some((header, rows.collect()))
    }

    /// Number of rows including the header.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of data rows.
    pub fn data_len(&self) -> usize {
        self.rows.len().saturating_sub(1)
    }

    /// Widest row in the grid.
    pub fn width(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    pub fn push(&mut self, row: Row) {
        self.rows.push(row);
    }

    /// Cell at `(row, col)`, padding short or missing rows with empty cells.
    pub fn cell(&self, row: usize, col: usize) -> &Cell {
        self.rows
            .get(row)
            .map(|r| cell_at(r, col))
            .unwrap_or(&EMPTY_CELL)
    }

    /// First header column whose rendered name satisfies `pred`.
    pub fn find_column(&self, mut pred: impl FnMut(&str) -> bool) -> Option<usize> {
        self.header()?
            .iter()
            .position(|cell| pred(&cell.render()))
    }

    /// Drop column `index` from every row that is wide enough to have it.
    pub fn without_column(&self, index: usize) -> Self {
        let rows = self
            .rows
            .iter()
            .map(|row| {
                row.iter()
                    .enumerate()
                    .filter(|(i, _)| *i != index)
                    .map(|(_, cell)| cell.clone())
                    .collect()
            })
            .collect();
        Self { rows }
    }
}

impl From<Vec<Row>> for Grid {
    fn from(rows: Vec<Row>) -> Self {
        Self { rows }
    }
}

impl FromIterator<Row> for Grid {
    fn from_iter<T: IntoIterator<Item = Row>>(iter: T) -> Self {
        Self {
            rows: iter.into_iter().collect(),
        }
    }
}
