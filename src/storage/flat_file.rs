//! A [`Store`] backed by two plain text files.

use std::{
    fs::{File, OpenOptions},
    io::{self, BufRead, BufReader, BufWriter, Write},
    path::{Path, PathBuf},
};

use tracing::{instrument, warn};

use super::{Error, Store, line};
use crate::domain::{Config, Record};

/// Stores records one per line in a books file, and appends borrow requests
/// to a separate log file.
///
/// Every save rewrites the whole books file. Writes are not atomic.
#[derive(Debug, Clone)]
pub struct FlatFileStore {
    books: PathBuf,
    log: PathBuf,
}

impl FlatFileStore {
    /// Creates a store using the given files. Neither needs to exist yet.
    #[must_use]
    pub const fn new(books: PathBuf, log: PathBuf) -> Self {
        Self { books, log }
    }

    /// Creates a store for the files named in `config`, resolved against
    /// the catalog root.
    #[must_use]
    pub fn from_config(root: &Path, config: &Config) -> Self {
        Self::new(root.join(config.books_file()), root.join(config.log_file()))
    }

    /// The books file.
    #[must_use]
    pub fn books_path(&self) -> &Path {
        &self.books
    }

    /// The request log.
    #[must_use]
    pub fn log_path(&self) -> &Path {
        &self.log
    }

    fn read_error(&self, source: io::Error) -> Error {
        Error::Read {
            path: self.books.clone(),
            source,
        }
    }
}

impl Store for FlatFileStore {
    #[instrument(skip(self), fields(path = %self.books.display()))]
    fn load_all(&mut self) -> Result<Vec<Record>, Error> {
        let file = match File::open(&self.books) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!("no books file, starting empty");
                return Ok(Vec::new());
            }
            Err(e) => return Err(self.read_error(e)),
        };

        let mut records = Vec::new();
        for (number, text) in BufReader::new(file).lines().enumerate() {
            let text = text.map_err(|e| self.read_error(e))?;
            if text.trim().is_empty() {
                continue;
            }
            match line::decode(&text) {
                Ok(record) => records.push(record),
                Err(e) => warn!(line = number + 1, "skipping malformed record: {e}"),
            }
        }

        tracing::debug!(count = records.len(), "loaded records");
        Ok(records)
    }

    #[instrument(skip_all, fields(path = %self.books.display(), count = records.len()))]
    fn save_all(&mut self, records: &[&Record]) -> Result<(), Error> {
        let write_error = |source| Error::Write {
            path: self.books.clone(),
            source,
        };

        let file = File::create(&self.books).map_err(write_error)?;
        let mut writer = BufWriter::new(file);
        for record in records {
            writeln!(writer, "{}", line::encode(record)).map_err(write_error)?;
        }
        writer.flush().map_err(write_error)
    }

    #[instrument(skip(self), fields(path = %self.log.display()))]
    fn append_log_line(&mut self, line: &str) -> Result<(), Error> {
        let write_error = |source| Error::Write {
            path: self.log.clone(),
            source,
        };

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log)
            .map_err(write_error)?;
        writeln!(file, "{line}").map_err(write_error)
    }
}
