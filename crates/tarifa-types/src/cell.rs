//! Cell values and the canonical cell normalizer.
//!
//! Spreadsheet cells arrive loosely typed: the same column may hold `1200`,
//! `"1200"`, `" $1,200 "` or nothing at all. [`normalize_cell`] is the single
//! place where a cell is turned into a comparable string.

use std::fmt;

use serde::{Deserialize, Serialize};

/// An untyped spreadsheet scalar.
///
/// Serializes untagged: numbers as JSON numbers, text as strings, and
/// `Empty` as `null`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    Number(f64),
    Text(String),
    #[default]
    Empty,
}

impl Cell {
    /// Build a text cell.
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    /// Returns `true` for `Empty` and for zero-length text.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Text(s) => s.is_empty(),
            Self::Number(_) => false,
        }
    }

    /// Returns `true` if the cell has no visible content.
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Text(s) => s.trim().is_empty(),
            Self::Number(_) => false,
        }
    }

    /// The finite numeric value of the cell, if any.
    ///
    /// Text is trimmed and parsed; empty text is not a number.
    pub fn as_number(&self) -> Option<f64> {
        let value = match self {
            Self::Number(n) => *n,
            Self::Text(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    return None;
                }
                trimmed.parse::<f64>().ok()?
            }
            Self::Empty => return None,
        };
        value.is_finite().then_some(value)
    }

    /// The integral value of the cell, if it is a whole number.
    pub fn as_integer(&self) -> Option<i64> {
        let n = self.as_number()?;
        if n.fract() != 0.0 || n < i64::MIN as f64 || n > i64::MAX as f64 {
            return None;
        }
        Some(n as i64)
    }

    /// Borrow the text payload, if this is a text cell.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Render the cell the way a spreadsheet user would read it.
    pub fn render(&self) -> String {
        match self {
            Self::Number(n) => format_number(*n),
            Self::Text(s) => s.clone(),
            Self::Empty => String::new(),
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => f.write_str(&format_number(*n)),
            Self::Text(s) => f.write_str(s),
            Self::Empty => Ok(()),
        }
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i64> for Cell {
    fn from(value: i64) -> Self {
        Self::Number(value as f64)
    }
}

impl From<i32> for Cell {
    fn from(value: i32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<Option<Cell>> for Cell {
    fn from(value: Option<Cell>) -> Self {
        value.unwrap_or_default()
    }
}

/// Render a number the way spreadsheet exports stringify it.
///
/// Whole numbers carry no fractional part (`1200.0` renders as `"1200"`) and
/// negative zero renders as `"0"`. Magnitudes below `1e-6` or from `1e21` up
/// switch to exponent notation with an explicit sign (`"1e+21"`, `"1.5e-7"`).
pub fn format_number(n: f64) -> String {
    if n == 0.0 {
        return "0".to_string();
    }
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    let magnitude = n.abs();
    if magnitude >= 1e21 || magnitude < 1e-6 {
        let exp = format!("{n:e}");
        return match exp.split_once('e') {
            Some((mantissa, power)) if !power.starts_with('-') => format!("{mantissa}e+{power}"),
            _ => exp,
        };
    }
    format!("{n}")
}

/// Collapse every run of whitespace to a single space and trim both ends.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Canonicalize a cell into a comparable string.
///
/// Empty cells become `""`. Everything else is rendered, lower-cased,
/// stripped of `$` and `,`, and whitespace-collapsed. A result that parses
/// as a finite number is only replaced by the number's own rendering when
/// the two are byte-identical, so `"1200.00"` stays `"1200.00"` while
/// `"1200"` and `1200` both normalize to `"1200"`.
pub fn normalize_cell(cell: &Cell) -> String {
    if cell.is_empty() {
        return String::new();
    }
    normalize_str(&cell.render())
}

/// [`normalize_cell`] for text that is already a string.
pub fn normalize_str(text: &str) -> String {
    let stripped: String = text
        .to_lowercase()
        .chars()
        .filter(|c| !matches!(c, '$' | ','))
        .collect();
    let collapsed = collapse_whitespace(&stripped);
    match collapsed.parse::<f64>() {
        Ok(n) if n.is_finite() && format_number(n) == collapsed => format_number(n),
        _ => collapsed,
    }
}
