use std::io::Write;

use clap::{Subcommand, ValueEnum};
use libris::{Catalog, CatalogError, Record, RecordId, Status, Store, domain::Stats};
use tracing::instrument;

use super::terminal::Colorize;

/// Catalog operations, shared by the one-shot commands and the shell.
#[derive(Debug, Subcommand)]
pub enum Operation {
    /// Add a new book
    Add {
        /// The book's title
        title: String,
        /// The book's author
        author: String,
    },

    /// Remove a book from the catalog
    ///
    /// The book can still be found by title afterwards.
    Remove {
        /// The id of the book to remove
        id: RecordId,
    },

    /// Show a book by id
    Show {
        /// The id of the book to show
        id: RecordId,
    },

    /// Find a book by title (case-insensitive)
    Search {
        /// The exact title to look for
        title: String,
    },

    /// List every book
    List {
        /// Sort by title instead of insertion order
        #[arg(long, short)]
        alphabetical: bool,

        /// Output format
        #[arg(long, value_enum, default_value_t)]
        output: OutputFormat,
    },

    /// Borrow a book
    Borrow {
        /// The id of the book to borrow
        id: RecordId,
    },

    /// Return a borrowed book
    Return {
        /// The id of the book to return
        id: RecordId,
    },

    /// Join the waiting list for a book
    Request {
        /// Who is asking
        user: String,
        /// The id of the requested book
        id: RecordId,
    },

    /// Take the oldest request off the waiting list
    Process,

    /// Undo the last borrow or return
    Undo,

    /// Show catalog statistics
    Status,
}

/// Supported listing formats.
#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

impl Operation {
    #[instrument(level = "debug", skip(catalog, out))]
    pub fn execute<S: Store>(
        self,
        catalog: &mut Catalog<S>,
        out: &mut impl Write,
    ) -> anyhow::Result<()> {
        match self {
            Self::Add { title, author } => {
                let record = catalog.add(&title, &author)?;
                writeln!(
                    out,
                    "{}",
                    format!(
                        "✅ Book added successfully: {} (ID: {})",
                        record.title(),
                        record.id()
                    )
                    .success()
                )?;
            }
            Self::Remove { id } => {
                let record = catalog.remove(id)?;
                writeln!(
                    out,
                    "{}",
                    format!("✅ Book removed successfully: {}", record.title()).success()
                )?;
            }
            Self::Show { id } => {
                let Some(record) = catalog.find_by_id(id) else {
                    return Err(CatalogError::NotFound(id).into());
                };
                writeln!(out, "Found: {record}")?;
            }
            Self::Search { title } => {
                let Some(record) = catalog.find_by_title(&title) else {
                    return Err(CatalogError::TitleNotFound(title).into());
                };
                writeln!(out, "Found: {record}")?;
                if catalog.find_by_id(record.id()).is_none() {
                    writeln!(out, "{}", "  (removed from the catalog)".dim())?;
                }
            }
            Self::List {
                alphabetical,
                output,
            } => {
                let records: Vec<&Record> = if alphabetical {
                    catalog.alphabetical().collect()
                } else {
                    catalog.by_insertion().collect()
                };
                list(out, &records, alphabetical, output)?;
            }
            Self::Borrow { id } => {
                let record = catalog.borrow_book(id)?;
                writeln!(
                    out,
                    "{}",
                    format!("✅ You borrowed: {}", record.title()).success()
                )?;
            }
            Self::Return { id } => {
                let record = catalog.return_book(id)?;
                writeln!(
                    out,
                    "{}",
                    format!("✅ Book returned: {}", record.title()).success()
                )?;
            }
            Self::Request { user, id } => {
                catalog.request_borrow(&user, id)?;
                writeln!(
                    out,
                    "Request added to waiting list for user: {user} (book {id})"
                )?;
            }
            Self::Process => match catalog.process_next_request() {
                Some(request) => writeln!(out, "Processing request: {request}")?,
                None => writeln!(out, "{}", "No waiting requests.".dim())?,
            },
            Self::Undo => match catalog.undo()? {
                Some(undone) => writeln!(
                    out,
                    "{}",
                    format!(
                        "↩️  Undid {}: book {} is now {}",
                        undone.action.kind,
                        undone.record.id(),
                        undone.record.status()
                    )
                    .success()
                )?,
                None => writeln!(out, "{}", "Nothing to undo.".dim())?,
            },
            Self::Status => status(out, catalog.stats())?,
        }
        Ok(())
    }
}

fn list(
    out: &mut impl Write,
    records: &[&Record],
    alphabetical: bool,
    output: OutputFormat,
) -> anyhow::Result<()> {
    if output == OutputFormat::Json {
        writeln!(out, "{}", serde_json::to_string_pretty(records)?)?;
        return Ok(());
    }

    let heading = if alphabetical {
        "All Books (Alphabetical Order)"
    } else {
        "All Books (Catalog Order)"
    };
    writeln!(out, "{}", format!("--- {heading} ---").info())?;

    if records.is_empty() {
        writeln!(out, "{}", "Library is empty.".dim())?;
    }
    for record in records {
        let line = record.to_string();
        if record.status() == Status::Borrowed {
            writeln!(out, "{}", line.warning())?;
        } else {
            writeln!(out, "{line}")?;
        }
    }
    Ok(())
}

fn status(out: &mut impl Write, stats: Stats) -> anyhow::Result<()> {
    writeln!(out, "Books:            {}", stats.records)?;
    writeln!(out, "Indexed titles:   {}", stats.indexed_titles)?;
    writeln!(out, "Array capacity:   {}", stats.capacity)?;
    writeln!(out, "Pending requests: {}", stats.pending_requests)?;
    writeln!(out, "Undo depth:       {}", stats.undo_depth)?;
    writeln!(out, "Last id:          {}", stats.last_id)?;

    let stale = stats.stale_titles;
    if stale > 0 {
        writeln!(
            out,
            "{}",
            format!("ℹ️  {stale} removed book(s) still reachable by title").dim()
        )?;
    }
    Ok(())
}
