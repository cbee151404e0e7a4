use std::fmt;

use serde::Serialize;

use crate::domain::{RecordId, Status};

/// A queued intent to borrow a book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Request {
    /// Who asked.
    pub user: String,
    /// The book they asked for. Not checked against the catalog.
    pub book_id: RecordId,
}

impl fmt::Display for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "User: {}, BookID: {}", self.user, self.book_id)
    }
}

/// The kind of transition recorded in the undo log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ActionKind {
    /// A book was borrowed.
    Borrow,
    /// A book was returned.
    Return,
}

impl ActionKind {
    /// The status that undoing this kind of action restores.
    ///
    /// Depends only on the kind, never on what the status was before.
    #[must_use]
    pub const fn inverse_status(self) -> Status {
        match self {
            Self::Borrow => Status::Available,
            Self::Return => Status::Borrowed,
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Borrow => "BORROW",
            Self::Return => "RETURN",
        })
    }
}

/// An undo log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Action {
    /// What happened.
    pub kind: ActionKind,
    /// The book it happened to.
    pub book_id: RecordId,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Action: {} on Book ID: {}", self.kind, self.book_id)
    }
}
