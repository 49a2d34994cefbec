use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tarifa_types::Grid;
use tracing::{debug, info};

use crate::error::{StoreError, StoreResult};
use crate::traits::{GridStore, RecordId, StoredGrid, Table};

/// On-disk form of one table.
///
/// ```text
/// <root>/baseData.json
/// { "next_id": 3, "records": [ { "id": 3, "inserted_at": "...", "data": [[...]] } ] }
/// ```
#[derive(Debug, Default, Serialize, Deserialize)]
struct TableDocument {
    #[serde(default)]
    next_id: u64,
    records: Vec<StoredGrid>,
}

impl TableDocument {
    fn push(&mut self, grid: &Grid) -> RecordId {
        let last = self.records.iter().map(|r| r.id.0).max().unwrap_or(0);
        self.next_id = self.next_id.max(last) + 1;
        let id = RecordId(self.next_id);
        self.records.push(StoredGrid {
            id,
            inserted_at: Utc::now(),
            data: grid.clone(),
        });
        id
    }
}

/// Grid store keeping one JSON document per table under a root directory.
///
/// Every mutation rewrites the whole table document into a temporary file
/// in the same directory and renames it over the old one. Mutations are
/// serialized through a mutex; reads go straight to disk.
pub struct JsonFileStore {
    root: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    /// Open (or create) a store rooted at `root`.
    pub fn open(root: impl AsRef<Path>) -> StoreResult<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root)?;
        info!(root = %root.display(), "grid store opened");
        Ok(Self {
            root,
            write_lock: Mutex::new(()),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the document backing `table`.
    pub fn table_path(&self, table: Table) -> PathBuf {
        self.root.join(format!("{}.json", table.name()))
    }

    fn load(&self, table: Table) -> StoreResult<TableDocument> {
        let path = self.table_path(table);
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(TableDocument::default()),
            Err(e) => return Err(e.into()),
        };
        serde_json::from_slice(&bytes).map_err(|e| StoreError::CorruptTable {
            path,
            reason: e.to_string(),
        })
    }

    fn save(&self, table: Table, document: &TableDocument) -> StoreResult<()> {
        let path = self.table_path(table);
        let staged = tempfile::NamedTempFile::new_in(&self.root)?;
        {
            let mut writer = BufWriter::new(staged.as_file());
            serde_json::to_writer(&mut writer, document)?;
            writer.flush()?;
        }
        staged.as_file().sync_all()?;
        staged.persist(&path).map_err(|e| StoreError::Io(e.error))?;
        debug!(
            %table,
            records = document.records.len(),
            path = %path.display(),
            "table written"
        );
        Ok(())
    }

    fn mutate<T>(
        &self,
        table: Table,
        f: impl FnOnce(&mut TableDocument) -> T,
    ) -> StoreResult<T> {
        let _guard = self.write_lock.lock().map_err(|_| StoreError::LockPoisoned)?;
        let mut document = self.load(table)?;
        let out = f(&mut document);
        self.save(table, &document)?;
        Ok(out)
    }
}

impl GridStore for JsonFileStore {
    fn clear(&self, table: Table) -> StoreResult<()> {
        self.mutate(table, |doc| doc.records.clear())
    }

    fn insert(&self, table: Table, grid: &Grid) -> StoreResult<RecordId> {
        self.mutate(table, |doc| doc.push(grid))
    }

    fn replace(&self, table: Table, grid: &Grid) -> StoreResult<RecordId> {
        self.mutate(table, |doc| {
            doc.records.clear();
            doc.push(grid)
        })
    }

    fn read_all(&self, table: Table) -> StoreResult<Vec<StoredGrid>> {
        Ok(self.load(table)?.records)
    }
}

impl std::fmt::Debug for JsonFileStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonFileStore")
            .field("root", &self.root)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tarifa_types::{row, Cell};

    fn sample(label: &str) -> Grid {
        Grid::from_rows(vec![
            row(["Tipo", "Clase", "Versiones", "Preciobase"]),
            row([Cell::from(4), Cell::Empty, Cell::text(label), Cell::from(1200.5)]),
        ])
    }

    #[test]
    fn missing_table_reads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::open(dir.path()).unwrap();
        assert!(store.read_all(Table::Base).unwrap().is_empty());
        assert_eq!(store.latest(Table::Base).unwrap(), None);
    }

    #[test]
    fn insert_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        {
            let store = JsonFileStore::open(dir.path()).unwrap();
            store.insert(Table::New, &sample("a")).unwrap();
            store.insert(Table::New, &sample("b")).unwrap();
        }
        let store = JsonFileStore::open(dir.path()).unwrap();
        let records = store.read_all(Table::New).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, RecordId(1));
        assert_eq!(records[1].data, sample("b"));
        assert!(dir.path().join("newData.json").exists());
        assert!(!dir.path().join("baseData.json").exists());
    }

    #[test]
    fn ids_keep_increasing_after_clear() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::open(dir.path()).unwrap();
        store.insert(Table::Base, &sample("a")).unwrap();
        let id = store.replace(Table::Base, &sample("b")).unwrap();
        assert_eq!(id, RecordId(2));
        assert_eq!(store.read_all(Table::Base).unwrap().len(), 1);
        assert_eq!(store.latest(Table::Base).unwrap(), Some(sample("b")));
    }

    #[test]
    fn replace_never_exposes_an_empty_table() {
        let dir = tempfile::tempdir().unwrap();
        let store = std::sync::Arc::new(JsonFileStore::open(dir.path()).unwrap());
        store.insert(Table::New, &sample("seed")).unwrap();

        let writer = {
            let store = std::sync::Arc::clone(&store);
            std::thread::spawn(move || {
                for i in 0..50 {
                    store.replace(Table::New, &sample(&format!("v{i}"))).unwrap();
                }
            })
        };
        while !writer.is_finished() {
            assert_eq!(store.read_all(Table::New).unwrap().len(), 1);
        }
        writer.join().unwrap();
        assert_eq!(store.latest(Table::New).unwrap(), Some(sample("v49")));
    }

    #[test]
    fn corrupt_document_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::open(dir.path()).unwrap();
        fs::write(store.table_path(Table::Base), b"not json").unwrap();
        let err = store.read_all(Table::Base).unwrap_err();
        assert!(matches!(err, StoreError::CorruptTable { .. }));
    }

    #[test]
    fn no_staging_files_left_behind() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::open(dir.path()).unwrap();
        store.insert(Table::Base, &sample("a")).unwrap();
        let entries: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(entries, vec![std::ffi::OsString::from("baseData.json")]);
    }
}
