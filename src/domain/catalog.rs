//! The catalog: one logical set of records behind two access paths.
//!
//! Records are held in a [`ResizableArray`] (insertion order, lookup by id)
//! and a [`SearchTree`] (alphabetical order, lookup by title). Both hold the
//! same [`SharedRecord`] handles, so a status change is seen through either.
//!
//! The tree has no removal. After [`Catalog::remove`] the record is gone
//! from the array but still reachable by title and still listed
//! alphabetically.

use std::{collections::HashSet, rc::Rc};

use thiserror::Error;
use tracing::{debug, instrument, warn};

use crate::{
    collections::{IndexOutOfRange, LinkedQueue, LinkedStack, ResizableArray, SearchTree},
    domain::{Action, ActionKind, Config, Record, RecordId, Request, SharedRecord, Status},
    storage::{self, Store, line::DELIMITER},
};

/// Errors returned by catalog operations.
///
/// None of these leave the catalog in an inconsistent state. A
/// [`CatalogError::Persistence`] failure is raised after the in-memory
/// change has been made, and that change is kept.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// No record in the catalog has this id.
    #[error("book {0} not found")]
    NotFound(RecordId),

    /// No record in the title index has this title.
    #[error("no book titled '{0}'")]
    TitleNotFound(String),

    /// Every id above the current counter is taken.
    #[error("no ids left above {0}")]
    IdsExhausted(RecordId),

    /// The record is already lent out.
    #[error("book {0} is already borrowed")]
    AlreadyBorrowed(RecordId),

    /// An index fell outside the record array.
    #[error(transparent)]
    OutOfRange(#[from] IndexOutOfRange),

    /// A field would not survive being persisted.
    #[error("invalid {field}: {reason}")]
    InvalidField {
        /// Which field was rejected.
        field: &'static str,
        /// Why it was rejected.
        reason: &'static str,
    },

    /// The backing store could not be read or written.
    #[error("storage error: {0}")]
    Persistence(#[from] storage::Error),
}

/// The result of a successful [`Catalog::undo`].
#[derive(Debug, Clone)]
pub struct Undone {
    /// The action that was reversed.
    pub action: Action,
    /// The record it was reversed on, with its restored status.
    pub record: SharedRecord,
}

/// A snapshot of catalog sizes, for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stats {
    /// Records in the array view.
    pub records: usize,
    /// Entries in the title tree, including ones removed from the array.
    pub indexed_titles: usize,
    /// Tree entries whose record is no longer in the array.
    pub stale_titles: usize,
    /// Slots allocated by the array view.
    pub capacity: usize,
    /// Borrow requests waiting to be processed.
    pub pending_requests: usize,
    /// Actions that can still be undone.
    pub undo_depth: usize,
    /// The most recently assigned id.
    pub last_id: RecordId,
}

/// A library catalog persisted through a [`Store`].
pub struct Catalog<S> {
    records: ResizableArray<SharedRecord>,
    titles: SearchTree<SharedRecord>,
    requests: LinkedQueue<Request>,
    history: LinkedStack<Action>,
    last_id: RecordId,
    store: S,
}

impl<S: Store> Catalog<S> {
    /// Opens a catalog, seeding both views from the store.
    ///
    /// Id assignment continues from the larger of the configured seed and
    /// the largest loaded id. A loaded record whose id was already seen is
    /// skipped.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Persistence`] if the store cannot be read.
    #[instrument(skip_all)]
    pub fn open(mut store: S, config: &Config) -> Result<Self, CatalogError> {
        let loaded = store.load_all()?;

        let mut catalog = Self {
            records: ResizableArray::new(),
            titles: SearchTree::new(),
            requests: LinkedQueue::new(),
            history: LinkedStack::new(),
            last_id: config.id_seed(),
            store,
        };

        let mut seen = HashSet::with_capacity(loaded.len());
        for record in loaded {
            if !seen.insert(record.id()) {
                warn!(id = record.id(), "skipping record with duplicate id");
                continue;
            }
            catalog.last_id = catalog.last_id.max(record.id());
            catalog.index(Rc::new(record));
        }

        debug!(
            records = catalog.records.len(),
            last_id = catalog.last_id,
            "opened catalog"
        );
        Ok(catalog)
    }

    /// Adds a new, available record and returns it.
    ///
    /// If another record already has this title (ignoring case) the new
    /// record is not reachable by title search.
    ///
    /// # Errors
    ///
    /// - [`CatalogError::InvalidField`] if the title or author is blank or
    ///   contains `;` or a line break. Nothing is changed.
    /// - [`CatalogError::IdsExhausted`] if the id counter is already at its
    ///   maximum. Nothing is changed.
    /// - [`CatalogError::Persistence`] if the catalog cannot be flushed. The
    ///   record is still added.
    #[instrument(skip(self))]
    pub fn add(&mut self, title: &str, author: &str) -> Result<SharedRecord, CatalogError> {
        validate_field("title", title)?;
        validate_field("author", author)?;

        let id = self
            .last_id
            .checked_add(1)
            .ok_or(CatalogError::IdsExhausted(self.last_id))?;
        self.last_id = id;
        let record = Rc::new(Record::new(id, title, author, Status::Available));
        self.index(Rc::clone(&record));
        self.flush()?;

        Ok(record)
    }

    /// Removes the record with this id from the array view.
    ///
    /// The title tree keeps its entry.
    ///
    /// # Errors
    ///
    /// - [`CatalogError::NotFound`] if no record has this id.
    /// - [`CatalogError::Persistence`] if the catalog cannot be flushed. The
    ///   record is still removed.
    #[instrument(skip(self))]
    pub fn remove(&mut self, id: RecordId) -> Result<SharedRecord, CatalogError> {
        let index = self.index_of(id)?;
        let removed = self.records.remove_at(index)?;
        self.flush()?;
        Ok(removed)
    }

    /// Marks an available record as borrowed and records the action for
    /// undo.
    ///
    /// # Errors
    ///
    /// - [`CatalogError::NotFound`] if no record has this id.
    /// - [`CatalogError::AlreadyBorrowed`] if the record is already lent out.
    ///   Nothing is changed.
    /// - [`CatalogError::Persistence`] if the catalog cannot be flushed.
    #[instrument(skip(self))]
    pub fn borrow_book(&mut self, id: RecordId) -> Result<SharedRecord, CatalogError> {
        let record = self.require(id)?;
        if record.status() == Status::Borrowed {
            return Err(CatalogError::AlreadyBorrowed(id));
        }

        record.set_status(Status::Borrowed);
        self.history.push(Action {
            kind: ActionKind::Borrow,
            book_id: id,
        });
        self.flush()?;
        Ok(record)
    }

    /// Marks a record as available and records the action for undo.
    ///
    /// The record does not have to be borrowed.
    ///
    /// # Errors
    ///
    /// - [`CatalogError::NotFound`] if no record has this id.
    /// - [`CatalogError::Persistence`] if the catalog cannot be flushed.
    #[instrument(skip(self))]
    pub fn return_book(&mut self, id: RecordId) -> Result<SharedRecord, CatalogError> {
        let record = self.require(id)?;

        record.set_status(Status::Available);
        self.history.push(Action {
            kind: ActionKind::Return,
            book_id: id,
        });
        self.flush()?;
        Ok(record)
    }

    /// Reverses the most recent borrow or return.
    ///
    /// The restored status depends only on the kind of action popped: an
    /// undone borrow makes the record available and an undone return makes
    /// it borrowed, whatever its status is now. Returns `None` if there is
    /// nothing to undo.
    ///
    /// # Errors
    ///
    /// - [`CatalogError::NotFound`] if the record has been removed since.
    ///   The action is discarded.
    /// - [`CatalogError::Persistence`] if the catalog cannot be flushed.
    #[instrument(skip(self))]
    pub fn undo(&mut self) -> Result<Option<Undone>, CatalogError> {
        let Some(action) = self.history.pop() else {
            return Ok(None);
        };

        let record = self.require(action.book_id)?;
        record.set_status(action.kind.inverse_status());
        self.flush()?;

        Ok(Some(Undone { action, record }))
    }

    /// Finds a record in the array view by id. Linear in the number of
    /// records.
    #[must_use]
    pub fn find_by_id(&self, id: RecordId) -> Option<&SharedRecord> {
        self.records.iter().find(|record| record.id() == id)
    }

    /// Finds a record by title, ignoring case.
    ///
    /// May return a record that has since been removed from the array view.
    #[must_use]
    pub fn find_by_title(&self, title: &str) -> Option<&SharedRecord> {
        self.titles.search(title)
    }

    /// Records in insertion order.
    pub fn by_insertion(&self) -> impl Iterator<Item = &Record> {
        self.records.iter().map(|record| &**record)
    }

    /// Records in ascending title order, including removed ones.
    pub fn alphabetical(&self) -> impl Iterator<Item = &Record> {
        self.titles.iter().map(|record| &**record)
    }

    /// Queues a borrow request and appends it to the request log.
    ///
    /// The book id is not checked and no status changes.
    ///
    /// # Errors
    ///
    /// - [`CatalogError::InvalidField`] if the user name is blank or
    ///   contains `;` or a line break. Nothing is queued.
    /// - [`CatalogError::Persistence`] if the log cannot be written. The
    ///   request is still queued.
    #[instrument(skip(self))]
    pub fn request_borrow(&mut self, user: &str, book_id: RecordId) -> Result<(), CatalogError> {
        validate_field("user name", user)?;

        self.requests.enqueue(Request {
            user: user.to_string(),
            book_id,
        });
        self.store
            .append_log_line(&format!("{user}{DELIMITER}Requested Book ID: {book_id}"))?;
        Ok(())
    }

    /// Takes the oldest pending request off the queue.
    ///
    /// The request is only reported; the book is not borrowed.
    pub fn process_next_request(&mut self) -> Option<Request> {
        let request = self.requests.dequeue();
        debug!(?request, "processed request");
        request
    }

    /// Current sizes of every structure.
    #[must_use]
    pub fn stats(&self) -> Stats {
        let live: HashSet<RecordId> = self.records.iter().map(|record| record.id()).collect();
        Stats {
            records: self.records.len(),
            indexed_titles: self.titles.len(),
            stale_titles: self
                .titles
                .iter()
                .filter(|record| !live.contains(&record.id()))
                .count(),
            capacity: self.records.capacity(),
            pending_requests: self.requests.len(),
            undo_depth: self.history.len(),
            last_id: self.last_id,
        }
    }

    /// The backing store.
    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    fn index(&mut self, record: SharedRecord) {
        self.records.push(Rc::clone(&record));
        if !self.titles.insert(record) {
            debug!("title already indexed, record only reachable by id");
        }
    }

    fn index_of(&self, id: RecordId) -> Result<usize, CatalogError> {
        self.records
            .position(|record| record.id() == id)
            .ok_or(CatalogError::NotFound(id))
    }

    fn require(&self, id: RecordId) -> Result<SharedRecord, CatalogError> {
        self.find_by_id(id)
            .cloned()
            .ok_or(CatalogError::NotFound(id))
    }

    fn flush(&mut self) -> Result<(), CatalogError> {
        let snapshot: Vec<&Record> = self.records.iter().map(|record| &**record).collect();
        self.store.save_all(&snapshot).map_err(|e| {
            warn!("catalog changed in memory but was not saved: {e}");
            CatalogError::from(e)
        })
    }
}

fn validate_field(field: &'static str, value: &str) -> Result<(), CatalogError> {
    let reason = if value.trim().is_empty() {
        "must not be blank"
    } else if value.contains([DELIMITER, '\n', '\r']) {
        "must not contain ';' or line breaks"
    } else {
        return Ok(());
    };
    Err(CatalogError::InvalidField { field, reason })
}
