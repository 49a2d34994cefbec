//! Separator ("type 0") row normalization.
//!
//! Insertion is a single streaming pass driven by [`ZeroState`]:
//!
//! | state        | input row                | emitted                                   | next state   |
//! |--------------|--------------------------|-------------------------------------------|--------------|
//! | any          | type 1                   | separator unless last emitted is one, row  | `AfterType1` |
//! | `AfterType1` | not type 0               | trailing separator, then the row's rule    | (row's rule) |
//! | any          | first type 2 of the grid | row                                       | `AfterType2` |
//! | any          | later type 2             | separator unless last emitted is one, row  | `AfterType2` |
//! | any          | anything else            | row                                       | `InBlock`    |
//! | `AfterType1` | end of input             | trailing separator                        | -            |
//!
//! The positional deletion of pre-existing separators is a separate stage,
//! [`LegacyZeroDeletion`], so its policy never mixes with the general rule.

use tarifa_types::{Row, RowType};
use tracing::debug;

use crate::config::LegacyZeroPolicy;
use crate::stage::TransformStage;

/// Delete pre-existing separators at the positions named by `policy`.
///
/// Positions refer to the rows as they were before any deletion.
pub fn delete_legacy_zero_rows(rows: Vec<Row>, policy: &LegacyZeroPolicy) -> Vec<Row> {
    let before = rows.len();
    let kept: Vec<Row> = rows
        .into_iter()
        .enumerate()
        .filter(|(i, row)| !(RowType::classify(row).is_separator() && policy.deletes(*i)))
        .map(|(_, row)| row)
        .collect();
    if kept.len() != before {
        debug!(deleted = before - kept.len(), ?policy, "legacy separator rows deleted");
    }
    kept
}

/// Position of the insertion pass relative to the rows emitted so far.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ZeroState {
    /// Nothing emitted yet.
    Start,
    /// A marker row was just emitted; `width` sizes its trailing separator.
    AfterType1 { width: usize },
    /// A section header was just emitted.
    AfterType2,
    /// Any other row was just emitted.
    InBlock,
}

struct ZeroRowMachine {
    state: ZeroState,
    first_section_seen: bool,
    inserted: usize,
    out: Vec<Row>,
}

impl ZeroRowMachine {
    fn new(capacity: usize) -> Self {
        Self {
            state: ZeroState::Start,
            first_section_seen: false,
            inserted: 0,
            out: Vec::with_capacity(capacity),
        }
    }

    fn last_is_separator(&self) -> bool {
        self.out
            .last()
            .is_some_and(|row| RowType::classify(row).is_separator())
    }

    fn insert_separator(&mut self, width: usize) {
        self.out.push(RowType::separator_row(width));
        self.inserted += 1;
    }

    fn separate_before(&mut self, width: usize) {
        if !self.last_is_separator() {
            self.insert_separator(width);
        }
    }

    fn step(&mut self, row: Row) {
        let row_type = RowType::classify(&row);

        if let ZeroState::AfterType1 { width } = self.state {
            if !row_type.is_separator() {
                self.insert_separator(width);
            }
        }

        self.state = match row_type {
            RowType::Marker => {
                self.separate_before(row.len());
                ZeroState::AfterType1 { width: row.len() }
            }
            RowType::Section => {
                if self.first_section_seen {
                    self.separate_before(row.len());
                }
                self.first_section_seen = true;
                ZeroState::AfterType2
            }
            _ => ZeroState::InBlock,
        };
        self.out.push(row);
    }

    fn finish(mut self) -> (Vec<Row>, usize) {
        if let ZeroState::AfterType1 { width } = self.state {
            self.insert_separator(width);
        }
        (self.out, self.inserted)
    }
}

/// Insert separators around markers and between sections.
pub fn insert_zero_rows(rows: Vec<Row>) -> Vec<Row> {
    let mut machine = ZeroRowMachine::new(rows.len());
    for row in rows {
        machine.step(row);
    }
    let (out, inserted) = machine.finish();
    debug!(inserted, "separator rows inserted");
    out
}

/// Pipeline stage wrapping [`delete_legacy_zero_rows`].
pub struct LegacyZeroDeletion {
    policy: LegacyZeroPolicy,
}

impl LegacyZeroDeletion {
    pub fn new(policy: LegacyZeroPolicy) -> Self {
        Self { policy }
    }
}

impl TransformStage for LegacyZeroDeletion {
    fn name(&self) -> &str {
        "legacy-zero-deletion"
    }

    fn apply(&self, rows: Vec<Row>) -> Vec<Row> {
        delete_legacy_zero_rows(rows, &self.policy)
    }
}

/// Pipeline stage wrapping [`insert_zero_rows`].
pub struct ZeroRowInsertion;

impl TransformStage for ZeroRowInsertion {
    fn name(&self) -> &str {
        "zero-row-insertion"
    }

    fn apply(&self, rows: Vec<Row>) -> Vec<Row> {
        insert_zero_rows(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tarifa_types::{row, Cell};

    fn typed(code: i32, label: &str) -> Row {
        row([Cell::from(code), Cell::Empty, Cell::text(label)])
    }

    fn codes(rows: &[Row]) -> Vec<Option<u8>> {
        rows.iter().map(|r| RowType::classify(r).code()).collect()
    }

    #[test]
    fn lone_marker_is_framed_once() {
        let out = insert_zero_rows(vec![typed(4, "a"), typed(1, "m"), typed(4, "b")]);
        assert_eq!(codes(&out), vec![Some(4), Some(0), Some(1), Some(0), Some(4)]);
        assert_eq!(out[1].len(), 3);
        assert_eq!(out[3].len(), 3);
    }

    #[test]
    fn marker_with_existing_separators_is_untouched() {
        let input = vec![typed(0, ""), typed(1, "m"), typed(0, "")];
        let out = insert_zero_rows(input.clone());
        assert_eq!(out, input);
    }

    #[test]
    fn marker_at_end_gets_trailing_separator() {
        let out = insert_zero_rows(vec![typed(1, "m")]);
        assert_eq!(codes(&out), vec![Some(0), Some(1), Some(0)]);
    }

    #[test]
    fn first_section_is_not_preceded_by_separator() {
        let out = insert_zero_rows(vec![
            typed(2, "Model A"),
            typed(3, "2024"),
            typed(4, "Trim"),
            typed(2, "Model B"),
            typed(3, "2024"),
        ]);
        assert_eq!(
            codes(&out),
            vec![Some(2), Some(3), Some(4), Some(0), Some(2), Some(3)]
        );
    }

    #[test]
    fn first_section_exception_applies_even_after_other_rows() {
        let out = insert_zero_rows(vec![typed(4, "orphan"), typed(2, "Model A")]);
        assert_eq!(codes(&out), vec![Some(4), Some(2)]);
    }

    #[test]
    fn section_after_marker_shares_one_separator() {
        let out = insert_zero_rows(vec![typed(2, "A"), typed(1, "m"), typed(2, "B")]);
        assert_eq!(
            codes(&out),
            vec![Some(2), Some(0), Some(1), Some(0), Some(2)]
        );
    }

    #[test]
    fn fixed_positions_use_original_indices() {
        // Grid rows 1..=4 are data rows 0..=3.
        let rows = vec![typed(0, ""), typed(0, ""), typed(0, ""), typed(2, "A")];
        let out = delete_legacy_zero_rows(rows, &LegacyZeroPolicy::default());
        assert_eq!(codes(&out), vec![Some(0), Some(2)]);
    }

    #[test]
    fn fixed_positions_only_delete_separators() {
        let rows = vec![typed(2, "A"), typed(3, "2024"), typed(4, "x")];
        let out = delete_legacy_zero_rows(rows.clone(), &LegacyZeroPolicy::default());
        assert_eq!(out, rows);
    }

    #[test]
    fn text_zero_counts_as_separator() {
        let rows = vec![row([Cell::text("0")]), typed(2, "A")];
        let out = delete_legacy_zero_rows(rows, &LegacyZeroPolicy::default());
        assert_eq!(codes(&out), vec![Some(2)]);
    }

    #[test]
    fn leading_window_policy() {
        let mut rows: Vec<Row> = (0..12).map(|_| typed(0, "")).collect();
        rows.push(typed(2, "A"));
        let out = delete_legacy_zero_rows(rows, &LegacyZeroPolicy::LeadingWindow { rows: 10 });
        assert_eq!(codes(&out), vec![Some(0), Some(0), Some(2)]);
    }
}
