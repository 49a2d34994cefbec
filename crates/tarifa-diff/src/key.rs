//! Row identity keys.
//!
//! A row is identified by `type|year|version`, where `year` is the
//! contextual year appended as the row's last cell. When the years of the
//! two files do not line up (a version surviving a model-year rollover), the
//! fallback key `type||version` still finds it.

use std::fmt;

use tarifa_types::{cell_at, collapse_whitespace, normalize_cell, Cell};

/// Sentinel for rows that cannot be keyed. Never matched.
pub const INVALID_KEY: &str = "invalid|invalid|invalid";

/// Year segment used when the contextual year is missing or zero.
pub const YEAR_FALLBACK_TOKEN: &str = "_";

const MIN_KEYED_WIDTH: usize = 3;

/// Composite identity of a year-stamped row.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum RowKey {
    /// Row too narrow to carry a version label.
    Invalid,
    Keyed {
        kind: String,
        year: String,
        version: String,
    },
}

impl RowKey {
    /// Derive the key of a row whose last cell is its contextual year.
    pub fn derive(row: &[Cell]) -> Self {
        if row.len() < MIN_KEYED_WIDTH {
            return Self::Invalid;
        }
        let kind = normalize_cell(cell_at(row, 0));
        let raw_year = row.last().map(normalize_cell).unwrap_or_default();
        let year = if raw_year.is_empty() || raw_year == "0" {
            YEAR_FALLBACK_TOKEN.to_string()
        } else {
            raw_year
        };
        let version = collapse_whitespace(&cell_at(row, 2).render()).to_lowercase();
        Self::Keyed {
            kind,
            year,
            version,
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Keyed { .. })
    }

    /// `type|year|version`, or [`INVALID_KEY`].
    pub fn full(&self) -> String {
        self.to_string()
    }

    /// `type||version`: the full key with its year segment blanked.
    pub fn fallback(&self) -> String {
        fallback_key(&self.full())
    }
}

impl fmt::Display for RowKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Invalid => f.write_str(INVALID_KEY),
            Self::Keyed {
                kind,
                year,
                version,
            } => write!(f, "{kind}|{year}|{version}"),
        }
    }
}

/// Replace the first `|...|` segment of a key string with `||`.
///
/// Strings with fewer than two separators are returned unchanged.
pub fn fallback_key(full: &str) -> String {
    let Some(first) = full.find('|') else {
        return full.to_string();
    };
    let Some(second) = full[first + 1..].find('|').map(|i| first + 1 + i) else {
        return full.to_string();
    };
    format!("{}||{}", &full[..first], &full[second + 1..])
}
