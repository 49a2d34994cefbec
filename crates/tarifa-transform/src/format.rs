//! Canonical display form for block labels and price notes.

use std::sync::LazyLock;

use regex::Regex;
use tarifa_types::{cell_at, parse_year_and_note, Cell, Row, RowType};

use crate::stage::TransformStage;

static CONDITION_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)unidades (?:nuevas|usadas)").expect("condition pattern is valid")
});

static LISTA_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)lista").expect("lista pattern is valid"));

/// Columns a formatted year-block header always has.
const BLOCK_HEADER_WIDTH: usize = 5;

fn format_block_header(mut row: Row, model: &str) -> Row {
    let label = cell_at(&row, 2).render();
    let year = parse_year_and_note(&label).year;
    let condition = CONDITION_PATTERN
        .find(&label)
        .map(|m| Cell::text(m.as_str()))
        .unwrap_or(Cell::Empty);

    let title = if year != 0 {
        format!("{year} {model}")
    } else {
        model.to_string()
    };

    if row.len() < BLOCK_HEADER_WIDTH {
        row.resize(BLOCK_HEADER_WIDTH, Cell::Empty);
    }
    row[2] = Cell::text(title.trim());
    row[3] = condition;
    row[4] = Cell::Empty;
    row
}

fn strip_list_note(mut row: Row) -> Row {
    if let Some(Cell::Text(price)) = row.get_mut(3) {
        if LISTA_PATTERN.is_match(price) {
            let stripped = LISTA_PATTERN.replace_all(price, "").trim().to_string();
            *price = stripped;
        }
    }
    row
}

/// Rewrite block headers and price notes, threading the current model name.
///
/// - type 2: remembers column 2 as the current model.
/// - type 3: column 2 becomes `"{year} {model}"`, column 3 the
///   "Unidades Nuevas/Usadas" condition (or empty), column 4 is cleared.
///   A label without a year yields just `"{model}"` rather than `"0 {model}"`.
/// - type 4: "Lista" is removed from the column 3 text.
///
/// Must run after [`crate::reorder_sections`], which reads the year from the
/// original column 2 text.
pub fn format_fields(rows: Vec<Row>) -> Vec<Row> {
    let (out, _) = rows.into_iter().fold(
        (Vec::new(), String::new()),
        |(mut out, model), row| {
            let (row, model) = match RowType::classify(&row) {
                RowType::Section => {
                    let name = cell_at(&row, 2).render();
                    (row, name)
                }
                RowType::YearBlock => (format_block_header(row, &model), model),
                RowType::Version => (strip_list_note(row), model),
                _ => (row, model),
            };
            out.push(row);
            (out, model)
        },
    );
    out
}

/// Pipeline stage wrapping [`format_fields`].
pub struct FieldFormatter;

impl TransformStage for FieldFormatter {
    fn name(&self) -> &str {
        "field-formatter"
    }

    fn apply(&self, rows: Vec<Row>) -> Vec<Row> {
        format_fields(rows)
    }
}
