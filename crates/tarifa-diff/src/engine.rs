use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};
use tarifa_types::{cell_at, normalize_cell, CellCoord, Grid, Row};
use tracing::{debug, info};

use crate::config::DiffConfig;
use crate::context::prepare_grid;
use crate::error::{DiffError, DiffResult, Side};
use crate::key::RowKey;

// ---------------------------------------------------------------------------
// ReferenceIndex
// ---------------------------------------------------------------------------

/// Lookup from full and fallback keys to reference data rows.
///
/// Unkeyable rows are never indexed. When several rows share a key, the
/// last one in grid order wins; the number of overwritten entries is kept
/// in `duplicates`.
pub struct ReferenceIndex<'a> {
    by_full: HashMap<String, &'a Row>,
    by_fallback: HashMap<String, &'a Row>,
    duplicates: usize,
}

impl<'a> ReferenceIndex<'a> {
    /// Index every data row of `reference` (the header is skipped).
    pub fn build(reference: &'a Grid) -> Self {
        let mut by_full = HashMap::new();
        let mut by_fallback = HashMap::new();
        let mut duplicates = 0;

        for row in reference.data_rows() {
            let key = RowKey::derive(row);
            if !key.is_valid() {
                continue;
            }
            if by_full.insert(key.full(), row).is_some() {
                duplicates += 1;
            }
            by_fallback.insert(key.fallback(), row);
        }

        if duplicates > 0 {
            debug!(duplicates, "duplicate reference keys, last row wins");
        }
        Self {
            by_full,
            by_fallback,
            duplicates,
        }
    }

    /// Find the reference row for `key`: full key first, then fallback.
    pub fn resolve(&self, key: &RowKey) -> (Option<&'a Row>, RowMatch) {
        if !key.is_valid() {
            return (None, RowMatch::Unkeyable);
        }
        if let Some(row) = self.by_full.get(&key.full()) {
            return (Some(*row), RowMatch::FullKey);
        }
        if let Some(row) = self.by_fallback.get(&key.fallback()) {
            return (Some(*row), RowMatch::FallbackKey);
        }
        (None, RowMatch::Unmatched)
    }

    pub fn len(&self) -> usize {
        self.by_full.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_full.is_empty()
    }

    /// Reference rows whose full key was already taken by an earlier row.
    pub fn duplicates(&self) -> usize {
        self.duplicates
    }
}

// ---------------------------------------------------------------------------
// Comparison
// ---------------------------------------------------------------------------

/// How a subject data row was paired with the reference.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowMatch {
    FullKey,
    FallbackKey,
    /// Keyed, but absent from the reference; compared against an empty row.
    Unmatched,
    /// Too narrow to key; never compared.
    Unkeyable,
}

/// Per-status row counts of a [`Comparison`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonSummary {
    pub full_key: usize,
    pub fallback_key: usize,
    pub unmatched: usize,
    pub unkeyable: usize,
    pub differing_cells: usize,
}

/// Result of comparing a subject grid against a reference grid.
#[derive(Clone, Debug, PartialEq)]
pub struct Comparison {
    /// The subject grid, unchanged.
    pub display_data: Grid,
    /// Differing cells, by data-row index and column.
    pub differences: BTreeSet<CellCoord>,
    /// Match status of each subject data row, in order.
    pub matches: Vec<RowMatch>,
}

impl Comparison {
    pub fn summary(&self) -> ComparisonSummary {
        let mut summary = ComparisonSummary {
            differing_cells: self.differences.len(),
            ..ComparisonSummary::default()
        };
        for status in &self.matches {
            match status {
                RowMatch::FullKey => summary.full_key += 1,
                RowMatch::FallbackKey => summary.fallback_key += 1,
                RowMatch::Unmatched => summary.unmatched += 1,
                RowMatch::Unkeyable => summary.unkeyable += 1,
            }
        }
        summary
    }

    pub fn is_different(&self, coord: &CellCoord) -> bool {
        self.differences.contains(coord)
    }

    /// Differences rendered as `"row:col"` strings, in coordinate order.
    pub fn difference_strings(&self) -> Vec<String> {
        self.differences.iter().map(ToString::to_string).collect()
    }
}

// ---------------------------------------------------------------------------
// compare
// ---------------------------------------------------------------------------

/// Compare `subject` against `reference`.
///
/// Both grids must already be year-stamped and pruned (see
/// [`prepare_grid`]). Every keyable subject data row is paired with a
/// reference row by full key, then by fallback key; rows with no partner are
/// compared against an empty row. The first `compared_columns` columns are
/// compared after normalization.
pub fn compare(subject: Grid, reference: &Grid, config: &DiffConfig) -> DiffResult<Comparison> {
    if subject.is_empty() {
        return Err(DiffError::MissingHeader {
            side: Side::Subject,
        });
    }
    if reference.is_empty() {
        return Err(DiffError::MissingHeader {
            side: Side::Reference,
        });
    }

    let index = ReferenceIndex::build(reference);
    let empty: Row = Vec::new();
    let mut differences = BTreeSet::new();
    let mut matches = Vec::with_capacity(subject.data_len());

    for (row_index, row) in subject.data_rows().iter().enumerate() {
        let key = RowKey::derive(row);
        let (partner, status) = index.resolve(&key);
        matches.push(status);

        if status == RowMatch::Unkeyable {
            continue;
        }
        if status == RowMatch::Unmatched {
            debug!(row = row_index, key = %key, "no reference row");
        }

        let partner = partner.unwrap_or(&empty);
        for col in 0..config.compared_columns {
            if normalize_cell(cell_at(row, col)) != normalize_cell(cell_at(partner, col)) {
                differences.insert(CellCoord::new(row_index, col));
            }
        }
    }

    let comparison = Comparison {
        display_data: subject,
        differences,
        matches,
    };
    let summary = comparison.summary();
    info!(
        indexed = index.len(),
        full_key = summary.full_key,
        fallback_key = summary.fallback_key,
        unmatched = summary.unmatched,
        unkeyable = summary.unkeyable,
        differing_cells = summary.differing_cells,
        "comparison complete"
    );
    Ok(comparison)
}

/// Prepare two raw grids and compare them.
pub fn compare_grids(
    raw_subject: &Grid,
    raw_reference: &Grid,
    config: &DiffConfig,
) -> DiffResult<Comparison> {
    let subject = prepare_grid(raw_subject, config);
    let reference = prepare_grid(raw_reference, config);
    compare(subject, &reference, config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tarifa_types::{row, Cell};

    fn header() -> Row {
        row(["Tipo", "Clase", "Versiones", "Preciobase", "Preciobase2", "Temp"])
    }

    fn line(code: i32, label: &str, base: &str, second: &str) -> Row {
        row([
            Cell::from(code),
            Cell::Empty,
            Cell::text(label),
            Cell::text(base),
            Cell::text(second),
            Cell::Empty,
        ])
    }

    fn coords(c: &Comparison) -> Vec<String> {
        c.difference_strings()
    }

    fn scenario(price: &str) -> Grid {
        Grid::with_header(
            header(),
            vec![
                row([
                    Cell::from(2),
                    Cell::text(""),
                    Cell::text("Model A"),
                    Cell::text(""),
                    Cell::text(""),
                    Cell::text(" "),
                ]),
                line(3, "2024 Unidades Nuevas", "", ""),
                line(4, "Trim 1", price, "900"),
            ],
        )
    }

    #[test]
    fn end_to_end_price_change_with_temp_column() {
        let base = scenario("1000");
        let fresh = scenario("1100");

        let result = compare_grids(&base, &fresh, &DiffConfig::default()).unwrap();
        assert_eq!(coords(&result), vec!["2:3"]);
        assert!(result.is_different(&CellCoord::new(2, 3)));
        assert_eq!(result.summary().full_key, 3);
    }

    #[test]
    fn single_price_change_flags_only_that_cell() {
        let header = row([
            "Tipo",
            "Clase",
            "Versiones",
            "Preciobase",
            "Preciobase2",
            "Extra",
            "YearContext",
        ]);
        let block = row(["3", "", "2024 Unidades Nuevas", "", "", "", "2024"]);
        let subject = Grid::with_header(
            header.clone(),
            vec![
                block.clone(),
                row(["4", "ClassA", "Trim X", "1000", "900", "_ignored_", "2024"]),
            ],
        );
        let reference = Grid::with_header(
            header,
            vec![
                block,
                row(["4", "ClassA", "Trim X", "1050", "900", "_ignored_", "2024"]),
            ],
        );

        let result = compare(subject, &reference, &DiffConfig::default()).unwrap();
        assert_eq!(coords(&result), vec!["1:3"]);
        assert_eq!(result.matches, vec![RowMatch::FullKey, RowMatch::FullKey]);
    }

    #[test]
    fn identical_grids_have_no_differences() {
        let grid = Grid::with_header(
            header(),
            vec![line(3, "2024", "", ""), line(4, "Trim", "1000", "900")],
        );
        let result = compare_grids(&grid, &grid, &DiffConfig::default()).unwrap();
        assert!(result.differences.is_empty());
    }

    #[test]
    fn fallback_key_matches_across_years() {
        let base = Grid::with_header(
            header(),
            vec![line(3, "2024", "", ""), line(4, "Trim X", "1000", "900")],
        );
        let fresh = Grid::with_header(
            header(),
            vec![line(3, "2025", "", ""), line(4, "trim   x", "1000", "900")],
        );
        let result = compare_grids(&fresh, &base, &DiffConfig::default()).unwrap();
        // The block headers carry different labels, so they share no key.
        assert_eq!(result.matches[0], RowMatch::Unmatched);
        assert_eq!(result.matches[1], RowMatch::FallbackKey);
        assert_eq!(coords(&result), vec!["0:0", "0:2"]);
    }

    #[test]
    fn unmatched_row_is_compared_against_empty() {
        let base = Grid::with_header(header(), vec![line(3, "2024", "", "")]);
        let fresh = Grid::with_header(
            header(),
            vec![line(3, "2024", "", ""), line(4, "New Trim", "1000", "")],
        );
        let result = compare_grids(&fresh, &base, &DiffConfig::default()).unwrap();
        assert_eq!(result.matches[1], RowMatch::Unmatched);
        assert_eq!(coords(&result), vec!["1:0", "1:2", "1:3"]);
    }

    #[test]
    fn unkeyable_rows_are_skipped() {
        let base = Grid::with_header(header(), vec![line(4, "Trim", "1", "2")]);
        let fresh = Grid::with_header(
            header(),
            vec![row([Cell::from(4)]), Vec::new(), line(4, "Trim", "1", "2")],
        );
        let result = compare(fresh, &base, &DiffConfig::default()).unwrap();
        assert_eq!(
            result.matches,
            vec![RowMatch::Unkeyable, RowMatch::Unkeyable, RowMatch::FullKey]
        );
        assert_eq!(result.summary().unkeyable, 2);
    }

    #[test]
    fn invalid_rows_never_enter_the_index() {
        let reference = Grid::with_header(
            header(),
            vec![Vec::new(), row([Cell::from(4), Cell::Empty])],
        );
        let index = ReferenceIndex::build(&reference);
        assert!(index.is_empty());
        assert_eq!(index.resolve(&RowKey::Invalid), (None, RowMatch::Unkeyable));
    }

    #[test]
    fn duplicate_reference_keys_last_wins() {
        let reference = Grid::with_header(
            row(["Tipo", "Clase", "Versiones", "Preciobase", "Year"]),
            vec![
                row([Cell::from(4), Cell::Empty, Cell::text("T"), Cell::text("1"), Cell::from(2024)]),
                row([Cell::from(4), Cell::Empty, Cell::text("T"), Cell::text("2"), Cell::from(2024)]),
            ],
        );
        let index = ReferenceIndex::build(&reference);
        assert_eq!(index.len(), 1);
        assert_eq!(index.duplicates(), 1);

        let key = RowKey::derive(&reference.data_rows()[0]);
        let (row, status) = index.resolve(&key);
        assert_eq!(status, RowMatch::FullKey);
        assert_eq!(row.unwrap()[3], Cell::text("2"));
    }

    #[test]
    fn numeric_and_text_prices_compare_equal() {
        let stamped_header = row(["Tipo", "Clase", "Versiones", "Preciobase", "Year"]);
        let subject = Grid::with_header(
            stamped_header.clone(),
            vec![row([Cell::from(4), Cell::Empty, Cell::text("T"), Cell::from(1200), Cell::from(2024)])],
        );
        let reference = Grid::with_header(
            stamped_header,
            vec![row([Cell::text("4"), Cell::Empty, Cell::text("t"), Cell::text("1200"), Cell::text("2024")])],
        );
        let result = compare(subject, &reference, &DiffConfig::default()).unwrap();
        assert!(result.differences.is_empty());
    }

    #[test]
    fn empty_grids_are_rejected() {
        let grid = Grid::from_rows(vec![header()]);
        let err = compare(Grid::new(), &grid, &DiffConfig::default()).unwrap_err();
        assert!(matches!(err, DiffError::MissingHeader { side: Side::Subject }));
        let err = compare(grid, &Grid::new(), &DiffConfig::default()).unwrap_err();
        assert_eq!(err.to_string(), "reference grid has no header row");
    }
}
