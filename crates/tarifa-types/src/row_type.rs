use serde::{Deserialize, Serialize};

use crate::cell::Cell;

/// The role of a row, read from the integer type code in column 0.
///
/// Anything that is not a whole number in `0..=4` is [`RowType::Other`] and
/// is never matched by type-specific rules.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RowType {
    /// `0`: separator; carries no business data.
    Separator,
    /// `1`: standalone marker, framed by separators.
    Marker,
    /// `2`: section header; column 2 names the model.
    Section,
    /// `3`: year-block header; column 2 holds year and condition text.
    YearBlock,
    /// `4`: version line; columns 2..4 hold label and prices.
    Version,
    /// Missing, non-numeric, or out-of-domain type code.
    Other,
}

impl RowType {
    /// Map an integer type code to a row type.
    pub fn from_code(code: i64) -> Self {
        match code {
            0 => Self::Separator,
            1 => Self::Marker,
            2 => Self::Section,
            3 => Self::YearBlock,
            4 => Self::Version,
            _ => Self::Other,
        }
    }

    /// Classify a row by its first cell.
    pub fn classify(row: &[Cell]) -> Self {
        row.first()
            .and_then(Cell::as_integer)
            .map(Self::from_code)
            .unwrap_or(Self::Other)
    }

    /// The integer type code, or `None` for [`RowType::Other`].
    pub fn code(&self) -> Option<u8> {
        match self {
            Self::Separator => Some(0),
            Self::Marker => Some(1),
            Self::Section => Some(2),
            Self::YearBlock => Some(3),
            Self::Version => Some(4),
            Self::Other => None,
        }
    }

    pub fn is_separator(&self) -> bool {
        matches!(self, Self::Separator)
    }

    /// Build a separator row of the given width (at least one cell).
    pub fn separator_row(width: usize) -> Vec<Cell> {
        let mut row = vec![Cell::Empty; width.max(1)];
        row[0] = Cell::from(0);
        row
    }
}
