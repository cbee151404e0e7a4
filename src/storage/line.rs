//! The one-record-per-line text encoding.
//!
//! Each record is written as four `;`-separated fields in a fixed order:
//!
//! ```text
//! 101;Dune;Frank Herbert;Available
//! ```

use std::num::ParseIntError;

use thiserror::Error;

use crate::domain::{Record, RecordId, Status, UnknownStatus};

/// Separator between fields.
pub const DELIMITER: char = ';';

/// A line that does not decode to a [`Record`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MalformedLine {
    /// The line did not have exactly four fields.
    #[error("expected 4 fields, found {0}")]
    FieldCount(usize),

    /// The first field is not an integer id.
    #[error("invalid id '{value}': {source}")]
    Id {
        /// The offending field.
        value: String,
        /// Why it failed to parse.
        source: ParseIntError,
    },

    /// The last field is not a known status.
    #[error(transparent)]
    Status(#[from] UnknownStatus),
}

/// Encodes a record as a line, without the trailing newline.
#[must_use]
pub fn encode(record: &Record) -> String {
    format!(
        "{id}{DELIMITER}{title}{DELIMITER}{author}{DELIMITER}{status}",
        id = record.id(),
        title = record.title(),
        author = record.author(),
        status = record.status(),
    )
}

/// Decodes a line produced by [`encode`].
///
/// # Errors
///
/// Returns [`MalformedLine`] if the line does not have exactly four fields,
/// or if the id or status field cannot be parsed.
pub fn decode(line: &str) -> Result<Record, MalformedLine> {
    let fields: Vec<&str> = line.split(DELIMITER).collect();
    let [id, title, author, status] = fields[..] else {
        return Err(MalformedLine::FieldCount(fields.len()));
    };

    let id: RecordId = id.trim().parse().map_err(|source| MalformedLine::Id {
        value: id.to_string(),
        source,
    })?;
    let status: Status = status.parse()?;

    Ok(Record::new(id, title, author, status))
}
