//! An in-memory [`Store`].

use super::{Error, Store};
use crate::domain::Record;

/// Keeps the persisted state in memory.
///
/// Useful for tests and benchmarks, and for running a catalog with no
/// durable storage at all.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    records: Vec<Record>,
    log: Vec<String>,
    saves: usize,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store that loads the given records.
    #[must_use]
    pub fn with_records(records: Vec<Record>) -> Self {
        Self {
            records,
            ..Self::default()
        }
    }

    /// The records as of the last save.
    #[must_use]
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Every line appended to the request log.
    #[must_use]
    pub fn log(&self) -> &[String] {
        &self.log
    }

    /// How many times the record set has been saved.
    #[must_use]
    pub const fn saves(&self) -> usize {
        self.saves
    }
}

impl Store for MemoryStore {
    fn load_all(&mut self) -> Result<Vec<Record>, Error> {
        Ok(self.records.clone())
    }

    fn save_all(&mut self, records: &[&Record]) -> Result<(), Error> {
        self.records = records.iter().copied().cloned().collect();
        self.saves += 1;
        Ok(())
    }

    fn append_log_line(&mut self, line: &str) -> Result<(), Error> {
        self.log.push(line.to_string());
        Ok(())
    }
}
