//! Persistence for catalogs.
//!
//! The catalog does not know how records are stored. It talks to a
//! [`Store`], which loads every record once at start-up, overwrites the
//! whole record set after each change, and appends lines to a request log.

use std::{io, path::PathBuf};

use thiserror::Error;

use crate::domain::Record;

mod flat_file;
pub mod line;
mod memory;

pub use flat_file::FlatFileStore;
pub use memory::MemoryStore;

/// A backing store for catalog records.
pub trait Store {
    /// Loads every persisted record, in stored order.
    ///
    /// Lines that cannot be decoded are skipped rather than failing the
    /// load.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store exists but cannot be read.
    fn load_all(&mut self) -> Result<Vec<Record>, Error>;

    /// Replaces the persisted record set with `records`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be written.
    fn save_all(&mut self, records: &[&Record]) -> Result<(), Error>;

    /// Appends a single line to the request log, keeping earlier lines.
    ///
    /// # Errors
    ///
    /// Returns an error if the log cannot be written.
    fn append_log_line(&mut self, line: &str) -> Result<(), Error>;
}

/// Errors raised by a [`Store`].
#[derive(Debug, Error)]
pub enum Error {
    /// A file could not be read.
    #[error("failed to read {}", path.display())]
    Read {
        /// The file being read.
        path: PathBuf,
        /// The underlying failure.
        #[source]
        source: io::Error,
    },

    /// A file could not be written.
    #[error("failed to write {}", path.display())]
    Write {
        /// The file being written.
        path: PathBuf,
        /// The underlying failure.
        #[source]
        source: io::Error,
    },
}
