use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::Utc;
use tarifa_types::Grid;
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::traits::{GridStore, RecordId, StoredGrid, Table};

#[derive(Default)]
struct TableData {
    next_id: u64,
    records: Vec<StoredGrid>,
}

impl TableData {
    fn push(&mut self, grid: &Grid) -> RecordId {
        self.next_id += 1;
        let id = RecordId(self.next_id);
        self.records.push(StoredGrid {
            id,
            inserted_at: Utc::now(),
            data: grid.clone(),
        });
        id
    }
}

/// In-memory, HashMap-based grid store.
///
/// Intended for tests and embedding. Tables live behind a `RwLock`; grids
/// are cloned on read and write. Ids keep increasing across `clear`.
pub struct InMemoryGridStore {
    tables: RwLock<HashMap<Table, TableData>>,
}

impl InMemoryGridStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            tables: RwLock::new(HashMap::new()),
        }
    }

    fn read_guard(&self) -> StoreResult<RwLockReadGuard<'_, HashMap<Table, TableData>>> {
        self.tables.read().map_err(|_| StoreError::LockPoisoned)
    }

    fn write_guard(&self) -> StoreResult<RwLockWriteGuard<'_, HashMap<Table, TableData>>> {
        self.tables.write().map_err(|_| StoreError::LockPoisoned)
    }

    /// Number of records currently held in `table`.
    pub fn len(&self, table: Table) -> usize {
        self.read_guard()
            .map(|tables| tables.get(&table).map_or(0, |t| t.records.len()))
            .unwrap_or(0)
    }

    /// Returns `true` if no table holds any record.
    pub fn is_empty(&self) -> bool {
        Table::ALL.iter().all(|t| self.len(*t) == 0)
    }
}

impl Default for InMemoryGridStore {
    fn default() -> Self {
        Self::new()
    }
}

impl GridStore for InMemoryGridStore {
    fn clear(&self, table: Table) -> StoreResult<()> {
        let mut tables = self.write_guard()?;
        if let Some(data) = tables.get_mut(&table) {
            data.records.clear();
        }
        debug!(%table, "table cleared");
        Ok(())
    }

    fn insert(&self, table: Table, grid: &Grid) -> StoreResult<RecordId> {
        let mut tables = self.write_guard()?;
        let id = tables.entry(table).or_default().push(grid);
        debug!(%table, %id, rows = grid.len(), "grid inserted");
        Ok(id)
    }

    fn replace(&self, table: Table, grid: &Grid) -> StoreResult<RecordId> {
        let mut tables = self.write_guard()?;
        let data = tables.entry(table).or_default();
        data.records.clear();
        let id = data.push(grid);
        debug!(%table, %id, rows = grid.len(), "table replaced");
        Ok(id)
    }

    fn read_all(&self, table: Table) -> StoreResult<Vec<StoredGrid>> {
        let tables = self.read_guard()?;
        Ok(tables
            .get(&table)
            .map(|data| data.records.clone())
            .unwrap_or_default())
    }
}

impl std::fmt::Debug for InMemoryGridStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryGridStore")
            .field("base_records", &self.len(Table::Base))
            .field("new_records", &self.len(Table::New))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tarifa_types::{row, Cell};

    fn sample(price: i32) -> Grid {
        Grid::from_rows(vec![
            row(["Tipo", "Clase", "Versiones", "Preciobase"]),
            row([Cell::from(4), Cell::Empty, Cell::text("Trim"), Cell::from(price)]),
        ])
    }

    #[test]
    fn insert_and_read_all() {
        let store = InMemoryGridStore::new();
        assert!(store.is_empty());

        let a = store.insert(Table::Base, &sample(1)).unwrap();
        let b = store.insert(Table::Base, &sample(2)).unwrap();
        assert!(b > a);

        let records = store.read_all(Table::Base).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].data, sample(1));
        assert_eq!(records[1].id, b);
        assert_eq!(store.len(Table::New), 0);
    }

    #[test]
    fn tables_are_independent() {
        let store = InMemoryGridStore::new();
        store.insert(Table::Base, &sample(1)).unwrap();
        store.insert(Table::New, &sample(2)).unwrap();
        store.clear(Table::Base).unwrap();

        assert!(store.read_all(Table::Base).unwrap().is_empty());
        assert_eq!(store.latest(Table::New).unwrap(), Some(sample(2)));
    }

    #[test]
    fn latest_of_empty_table_is_none() {
        let store = InMemoryGridStore::new();
        assert_eq!(store.latest(Table::New).unwrap(), None);
    }

    #[test]
    fn replace_keeps_a_single_record() {
        let store = InMemoryGridStore::new();
        store.insert(Table::New, &sample(1)).unwrap();
        store.insert(Table::New, &sample(2)).unwrap();
        let id = store.replace(Table::New, &sample(3)).unwrap();

        let records = store.read_all(Table::New).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, id);
        assert_eq!(id, RecordId(3));
    }

    #[test]
    fn replace_is_seen_whole_by_concurrent_readers() {
        let store = std::sync::Arc::new(InMemoryGridStore::new());
        store.insert(Table::Base, &sample(0)).unwrap();

        let writer = {
            let store = std::sync::Arc::clone(&store);
            std::thread::spawn(move || {
                for price in 1..=200 {
                    store.replace(Table::Base, &sample(price)).unwrap();
                }
            })
        };
        while !writer.is_finished() {
            assert_eq!(store.len(Table::Base), 1);
        }
        writer.join().unwrap();
        assert_eq!(store.latest(Table::Base).unwrap(), Some(sample(200)));
    }

    #[test]
    fn debug_shows_counts() {
        let store = InMemoryGridStore::new();
        store.insert(Table::Base, &sample(1)).unwrap();
        let dbg = format!("{store:?}");
        assert!(dbg.contains("base_records: 1"));
    }
}
