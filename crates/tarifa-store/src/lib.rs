//! Grid record storage for Tarifa.
//!
//! Loaded price lists are kept as records in one of two named tables, the
//! base list and the new list. Loading a file replaces a table's contents;
//! the most recent record of each table is the one the diff reads.
//!
//! # Storage Backends
//!
//! All backends implement the [`GridStore`] trait:
//!
//! - [`InMemoryGridStore`] -- `HashMap`-based store for tests and embedding
//! - [`JsonFileStore`] -- one JSON document per table under a root directory
//!
//! # Design Rules
//!
//! 1. Record ids are assigned by the store and increase within a table.
//! 2. `read_all` returns records in insertion order.
//! 3. A file-backed table is replaced atomically; readers never see a torn write.
//! 4. All I/O errors are propagated, never silently ignored.

pub mod error;
pub mod file;
pub mod memory;
pub mod traits;

pub use error::{StoreError, StoreResult};
pub use file::JsonFileStore;
pub use memory::InMemoryGridStore;
pub use traits::{GridStore, RecordId, StoredGrid, Table};
