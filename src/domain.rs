//! Domain models for the library catalog.
//!
//! This module contains the catalog records, the transient request and
//! undo entries, the [`Catalog`] that ties them together, and
//! configuration.

/// The catalog orchestrating the array and tree views.
pub mod catalog;
pub use catalog::{Catalog, CatalogError, Stats, Undone};

mod config;
pub use config::Config;

mod record;
pub use record::{Record, RecordId, SharedRecord, Status, UnknownStatus};

mod request;
pub use request::{Action, ActionKind, Request};
