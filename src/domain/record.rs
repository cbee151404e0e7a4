use std::{cell::Cell, fmt, rc::Rc, str::FromStr};

use serde::Serialize;
use thiserror::Error;

use crate::collections::Keyed;

/// Identifier of a record. Unique within a catalog.
pub type RecordId = u64;

/// A record shared between the catalog's array and tree views.
///
/// Both views hold the same allocation, so a status change made through
/// one is visible through the other.
pub type SharedRecord = Rc<Record>;

/// Whether a book can currently be borrowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Status {
    /// On the shelf.
    Available,
    /// Lent out.
    Borrowed,
}

impl Status {
    /// The persisted and displayed form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Available => "Available",
            Self::Borrowed => "Borrowed",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A string that is not a known [`Status`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown status '{0}'")]
pub struct UnknownStatus(pub String);

impl FromStr for Status {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("available") {
            Ok(Self::Available)
        } else if s.eq_ignore_ascii_case("borrowed") {
            Ok(Self::Borrowed)
        } else {
            Err(UnknownStatus(s.to_string()))
        }
    }
}

/// One catalog item.
///
/// Only the status can change once a record exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Record {
    id: RecordId,
    title: String,
    author: String,
    status: Cell<Status>,
}

impl Record {
    /// Creates a record.
    #[must_use]
    pub fn new(
        id: RecordId,
        title: impl Into<String>,
        author: impl Into<String>,
        status: Status,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            author: author.into(),
            status: Cell::new(status),
        }
    }

    /// The record's id.
    #[must_use]
    pub const fn id(&self) -> RecordId {
        self.id
    }

    /// The title, which is also the alphabetical sort key.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// The author.
    #[must_use]
    pub fn author(&self) -> &str {
        &self.author
    }

    /// The current status.
    #[must_use]
    pub fn status(&self) -> Status {
        self.status.get()
    }

    pub(crate) fn set_status(&self, status: Status) {
        self.status.set(status);
    }
}

impl Keyed for Record {
    fn key(&self) -> &str {
        &self.title
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ID: {} | Title: {} | Author: {} | Status: {}",
            self.id,
            self.title,
            self.author,
            self.status()
        )
    }
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    #[test_case("Available", Status::Available; "persisted available")]
    #[test_case("available", Status::Available; "lowercase")]
    #[test_case("BORROWED", Status::Borrowed; "uppercase")]
    #[test_case(" Borrowed ", Status::Borrowed; "surrounding whitespace")]
    fn parses_status(input: &str, expected: Status) {
        assert_eq!(input.parse::<Status>(), Ok(expected));
    }

    #[test]
    fn rejects_unknown_status() {
        assert_eq!(
            "Lost".parse::<Status>(),
            Err(UnknownStatus("Lost".to_string()))
        );
    }

    #[test]
    fn status_change_is_visible_through_every_handle() {
        let record: SharedRecord = Rc::new(Record::new(1, "Dune", "Herbert", Status::Available));
        let other = Rc::clone(&record);

        other.set_status(Status::Borrowed);

        assert_eq!(record.status(), Status::Borrowed);
        assert!(Rc::ptr_eq(&record, &other));
    }

    #[test]
    fn displays_all_fields() {
        let record = Record::new(101, "Dune", "Frank Herbert", Status::Borrowed);
        assert_eq!(
            record.to_string(),
            "ID: 101 | Title: Dune | Author: Frank Herbert | Status: Borrowed"
        );
    }
}
