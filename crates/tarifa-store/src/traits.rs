use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tarifa_types::Grid;

use crate::error::StoreResult;

/// The two tables a price-list session works with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Table {
    /// The reference price list (`baseData`).
    #[serde(rename = "baseData")]
    Base,
    /// The incoming price list (`newData`).
    #[serde(rename = "newData")]
    New,
}

impl Table {
    pub const ALL: [Table; 2] = [Table::Base, Table::New];

    /// Storage name of the table.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Base => "baseData",
            Self::New => "newData",
        }
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Table {
    type Err = String;

    /// Accepts the storage name or the short form (`base`, `new`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "base" | "baseData" => Ok(Self::Base),
            "new" | "newData" => Ok(Self::New),
            other => Err(format!("unknown table: {other}")),
        }
    }
}

/// Store-assigned record identifier, increasing within a table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub u64);

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A grid as held by a store.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StoredGrid {
    pub id: RecordId,
    pub inserted_at: DateTime<Utc>,
    pub data: Grid,
}

/// Table-keyed grid storage.
///
/// Implementations must keep records of a table in insertion order and
/// never reuse a record id within a table.
pub trait GridStore: Send + Sync {
    /// Remove every record of `table`.
    fn clear(&self, table: Table) -> StoreResult<()>;

    /// Append a grid to `table` and return its id.
    fn insert(&self, table: Table, grid: &Grid) -> StoreResult<RecordId>;

    /// All records of `table`, oldest first.
    fn read_all(&self, table: Table) -> StoreResult<Vec<StoredGrid>>;

    /// The most recently inserted grid of `table`, if any.
    fn latest(&self, table: Table) -> StoreResult<Option<Grid>> {
        Ok(self.read_all(table)?.pop().map(|record| record.data))
    }

    /// Make `grid` the only record of `table` in one step.
    ///
    /// Readers see either the previous records or the new one, never an
    /// empty table in between. On failure the previous records remain.
    fn replace(&self, table: Table, grid: &Grid) -> StoreResult<RecordId>;
}
