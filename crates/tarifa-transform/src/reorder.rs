//! Year-block reordering inside model sections.
//!
//! A section starts at each type-2 row. Inside it, every type-3 row opens a
//! year-block that collects the type-4 rows following it. Blocks are sorted
//! newest year first; within a year, new units come before used units and
//! both before unlabelled blocks. Equal keys keep their encounter order.

use tarifa_types::{cell_at, parse_year_and_note, Row, RowType};
use tracing::debug;

use crate::stage::TransformStage;

struct YearBlock {
    year: i32,
    priority: u8,
    rows: Vec<Row>,
}

impl YearBlock {
    fn open(header: Row) -> Self {
        let parsed = parse_year_and_note(&cell_at(&header, 2).render());
        Self {
            year: parsed.year,
            priority: parsed.condition().priority(),
            rows: vec![header],
        }
    }
}

/// One model section split into its parts.
///
/// Rows that are neither block headers nor version lines are kept: those
/// seen before the first block form the preamble, later ones the trailer.
struct Section {
    header: Row,
    preamble: Vec<Row>,
    blocks: Vec<YearBlock>,
    trailer: Vec<Row>,
}

impl Section {
    fn new(header: Row) -> Self {
        Self {
            header,
            preamble: Vec::new(),
            blocks: Vec::new(),
            trailer: Vec::new(),
        }
    }

    fn push(&mut self, row: Row) {
        match RowType::classify(&row) {
            RowType::YearBlock => self.blocks.push(YearBlock::open(row)),
            RowType::Version => match self.blocks.last_mut() {
                Some(block) => block.rows.push(row),
                None => self.preamble.push(row),
            },
            _ if self.blocks.is_empty() => self.preamble.push(row),
            _ => self.trailer.push(row),
        }
    }

    fn flush_into(mut self, out: &mut Vec<Row>) {
        // `sort_by` is stable, so equal (year, priority) keep encounter order.
        self.blocks
            .sort_by(|a, b| b.year.cmp(&a.year).then(a.priority.cmp(&b.priority)));
        debug!(blocks = self.blocks.len(), "section reordered");

        out.push(self.header);
        out.extend(self.preamble);
        for block in self.blocks {
            out.extend(block.rows);
        }
        out.extend(self.trailer);
    }
}

/// Reorder the year-blocks of every section.
///
/// Rows before the first section header pass through untouched.
pub fn reorder_sections(rows: Vec<Row>) -> Vec<Row> {
    let mut out = Vec::with_capacity(rows.len());
    let mut current: Option<Section> = None;

    for row in rows {
        if RowType::classify(&row) == RowType::Section {
            if let Some(section) = current.take() {
                section.flush_into(&mut out);
            }
            current = Some(Section::new(row));
            continue;
        }
        match current.as_mut() {
            Some(section) => section.push(row),
            None => out.push(row),
        }
    }
    if let Some(section) = current {
        section.flush_into(&mut out);
    }
    out
}

/// Pipeline stage wrapping [`reorder_sections`].
pub struct SectionReorder;

impl TransformStage for SectionReorder {
    fn name(&self) -> &str {
        "section-reorder"
    }

    fn apply(&self, rows: Vec<Row>) -> Vec<Row> {
        reorder_sections(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tarifa_types::Cell;

    fn typed(code: i32, label: &str) -> Row {
        tarifa_types::row([Cell::from(code), Cell::Empty, Cell::text(label)])
    }

    fn labels(rows: &[Row]) -> Vec<String> {
        rows.iter().map(|r| cell_at(r, 2).render()).collect()
    }

    #[test]
    fn year_descending_dominates_condition() {
        let rows = vec![
            typed(2, "INTEGRA"),
            typed(3, "2023 Unidades Usadas"),
            typed(4, "u1"),
            typed(3, "2025 Unidades Nuevas"),
            typed(4, "n1"),
            typed(4, "n2"),
            typed(3, "2024"),
            typed(4, "p1"),
        ];
        let out = reorder_sections(rows);
        assert_eq!(
            labels(&out),
            vec![
                "INTEGRA",
                "2025 Unidades Nuevas",
                "n1",
                "n2",
                "2024",
                "p1",
                "2023 Unidades Usadas",
                "u1",
            ]
        );
    }

    #[test]
    fn same_year_sorted_by_condition_then_encounter() {
        let rows = vec![
            typed(2, "M"),
            typed(3, "2024 sin nota A"),
            typed(3, "2024 Unidades Usadas"),
            typed(3, "2024 sin nota B"),
            typed(3, "2024 Unidades Nuevas"),
        ];
        let out = reorder_sections(rows);
        assert_eq!(
            labels(&out),
            vec![
                "M",
                "2024 Unidades Nuevas",
                "2024 Unidades Usadas",
                "2024 sin nota A",
                "2024 sin nota B",
            ]
        );
    }

    #[test]
    fn rows_before_first_section_pass_through() {
        let rows = vec![
            typed(3, "2020"),
            typed(3, "2025"),
            typed(2, "M"),
            typed(3, "2021"),
            typed(3, "2022"),
        ];
        let out = reorder_sections(rows);
        assert_eq!(labels(&out), vec!["2020", "2025", "M", "2022", "2021"]);
    }

    #[test]
    fn sections_are_sorted_independently() {
        let rows = vec![
            typed(2, "A"),
            typed(3, "2023"),
            typed(3, "2024"),
            typed(0, ""),
            typed(2, "B"),
            typed(3, "2020"),
            typed(3, "2021"),
        ];
        let out = reorder_sections(rows);
        assert_eq!(
            labels(&out),
            vec!["A", "2024", "2023", "", "B", "2021", "2020"]
        );
        // The separator stays at the end of section A.
        assert_eq!(RowType::classify(&out[3]), RowType::Separator);
    }

    #[test]
    fn stray_rows_before_first_block_stay_after_header() {
        let rows = vec![
            typed(2, "A"),
            typed(4, "orphan"),
            typed(3, "2023"),
            typed(3, "2024"),
        ];
        let out = reorder_sections(rows);
        assert_eq!(labels(&out), vec!["A", "orphan", "2024", "2023"]);
    }

    #[test]
    fn unparseable_years_sort_last() {
        let rows = vec![typed(2, "A"), typed(3, "Sin año"), typed(3, "2019")];
        let out = reorder_sections(rows);
        assert_eq!(labels(&out), vec!["A", "2019", "Sin año"]);
    }
}
