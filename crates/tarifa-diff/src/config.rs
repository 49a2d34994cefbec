use serde::{Deserialize, Serialize};

use crate::context::YEAR_CONTEXT_HEADER;

/// Configuration for preparing and comparing grids.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiffConfig {
    /// Columns compared per row, starting at column 0
    /// (type, class, version, base price, secondary price).
    pub compared_columns: usize,
    /// Header label given to the appended contextual-year column.
    pub year_header: String,
    /// Case-insensitive substring identifying the scratch column to drop.
    pub temp_marker: String,
}

impl Default for DiffConfig {
    fn default() -> Self {
        Self {
            compared_columns: 5,
            year_header: YEAR_CONTEXT_HEADER.to_string(),
            temp_marker: "temp".to_string(),
        }
    }
}
