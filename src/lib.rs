//! Plain-text Library Catalog Management
//!
//! Books are kept in a flat text file, one record per line, and managed
//! through a [`Catalog`] built on hand-written containers.

pub mod collections;

pub mod domain;
pub use domain::{Catalog, CatalogError, Config, Record, RecordId, Status};

/// Persistence for catalog records.
pub mod storage;
pub use storage::{FlatFileStore, MemoryStore, Store};
