//! Year and condition extraction from free-text block labels.
//!
//! Year-block headers carry labels such as `"2025 INTEGRA Unidades Nuevas"`.
//! The year drives block ordering and contextual keys; the residual note
//! decides the condition tie-break.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

// ASCII word boundaries: a year glued to an accented letter ("Año2025") still counts.
static YEAR_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?-u:\b)(?:19|20)[0-9]{2}(?-u:\b)").expect("year pattern is valid")
});

/// A year parsed out of a label, plus whatever text remained.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearNote {
    /// Four-digit year, or `0` when none was found.
    pub year: i32,
    /// Label text with the matched year removed, trimmed.
    pub note: String,
}

impl YearNote {
    pub fn has_year(&self) -> bool {
        self.year != 0
    }

    pub fn condition(&self) -> Condition {
        Condition::from_note(&self.note)
    }
}

/// Parse the first whole-word year starting with `19` or `20`.
///
/// Only the first match is removed; any later years stay in the note.
pub fn parse_year_and_note(text: &str) -> YearNote {
    match YEAR_PATTERN.find(text) {
        Some(m) => {
            let mut note = String::with_capacity(text.len());
            note.push_str(&text[..m.start()]);
            note.push_str(&text[m.end()..]);
            YearNote {
                year: m.as_str().parse().unwrap_or(0),
                note: note.trim().to_string(),
            }
        }
        None => YearNote {
            year: 0,
            note: text.trim().to_string(),
        },
    }
}

/// Unit condition named in a block note.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Condition {
    /// "Unidades Nuevas"
    New,
    /// "Unidades Usadas"
    Used,
    Unspecified,
}

impl Condition {
    /// Substring match, case-insensitive; "nueva" wins over "usada".
    pub fn from_note(note: &str) -> Self {
        let lower = note.to_lowercase();
        if lower.contains("nueva") {
            Self::New
        } else if lower.contains("usada") {
            Self::Used
        } else {
            Self::Unspecified
        }
    }

    /// Sort rank: new units first, then used, then unspecified.
    pub fn priority(&self) -> u8 {
        match self {
            Self::New => 1,
            Self::Used => 2,
            Self::Unspecified => 3,
        }
    }
}
