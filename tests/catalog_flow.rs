//! End-to-end catalog behaviour against the flat-file store.

#![allow(missing_docs)]

use std::fs;

use libris::{Catalog, CatalogError, Config, FlatFileStore, Status};
use tempfile::TempDir;

fn open(tmp: &TempDir) -> Catalog<FlatFileStore> {
    let config = Config::load_or_default(tmp.path());
    Catalog::open(FlatFileStore::from_config(tmp.path(), &config), &config).unwrap()
}

fn books_file(tmp: &TempDir) -> String {
    fs::read_to_string(tmp.path().join("books.txt")).unwrap()
}

#[test]
fn library_session() {
    let tmp = TempDir::new().unwrap();
    let mut catalog = open(&tmp);

    // two books, sequential ids from the default seed
    let dune = catalog.add("Dune", "Herbert").unwrap().id();
    let foundation = catalog.add("Foundation", "Asimov").unwrap().id();
    assert_eq!((dune, foundation), (101, 102));
    for record in catalog.by_insertion() {
        assert_eq!(record.status(), Status::Available);
    }

    // borrowing twice is refused and changes nothing
    catalog.borrow_book(dune).unwrap();
    assert!(matches!(
        catalog.borrow_book(dune),
        Err(CatalogError::AlreadyBorrowed(_))
    ));
    assert_eq!(catalog.find_by_id(dune).unwrap().status(), Status::Borrowed);
    assert_eq!(
        books_file(&tmp),
        "101;Dune;Herbert;Borrowed\n102;Foundation;Asimov;Available\n"
    );

    // undo reverts the borrow and is flushed
    catalog.undo().unwrap().unwrap();
    assert_eq!(
        catalog.find_by_id(dune).unwrap().status(),
        Status::Available
    );
    assert_eq!(
        books_file(&tmp),
        "101;Dune;Herbert;Available\n102;Foundation;Asimov;Available\n"
    );

    // removal only touches the array view
    catalog.remove(foundation).unwrap();
    assert!(catalog.find_by_id(foundation).is_none());
    assert_eq!(
        catalog.find_by_title("Foundation").map(|r| r.id()),
        Some(foundation)
    );
    assert_eq!(books_file(&tmp), "101;Dune;Herbert;Available\n");

    // requests are reported in order and logged, never applied
    catalog.request_borrow("alice", dune).unwrap();
    let request = catalog.process_next_request().unwrap();
    assert_eq!((request.user.as_str(), request.book_id), ("alice", dune));
    assert!(catalog.process_next_request().is_none());
    assert_eq!(
        catalog.find_by_id(dune).unwrap().status(),
        Status::Available
    );
    assert_eq!(
        fs::read_to_string(tmp.path().join("users.txt")).unwrap(),
        "alice;Requested Book ID: 101\n"
    );
}

#[test]
fn reopening_restores_records_but_not_session_state() {
    let tmp = TempDir::new().unwrap();
    {
        let mut catalog = open(&tmp);
        catalog.add("Dune", "Herbert").unwrap();
        let emma = catalog.add("Emma", "Austen").unwrap().id();
        catalog.borrow_book(emma).unwrap();
        catalog.request_borrow("bob", emma).unwrap();
        let gone = catalog.add("Ulysses", "Joyce").unwrap().id();
        catalog.remove(gone).unwrap();
    }

    let mut catalog = open(&tmp);
    let stats = catalog.stats();
    assert_eq!(stats.records, 2);
    assert_eq!(stats.pending_requests, 0);
    assert_eq!(stats.undo_depth, 0);

    // the removed book is not persisted, so reopening drops its stale title
    assert!(catalog.find_by_title("ulysses").is_none());
    assert_eq!(
        catalog.find_by_title("EMMA").unwrap().status(),
        Status::Borrowed
    );
    assert!(catalog.undo().unwrap().is_none());

    // the counter resumes from the largest persisted id
    assert_eq!(stats.last_id, 102);
    assert_eq!(catalog.add("Hyperion", "Simmons").unwrap().id(), 103);
}

#[test]
fn malformed_lines_are_skipped_on_load() {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join("books.txt"),
        "120;Emma;Austen;Available\nbroken line\n121;Dune;Herbert\n",
    )
    .unwrap();

    let mut catalog = open(&tmp);

    assert_eq!(catalog.stats().records, 1);
    assert_eq!(catalog.add("Dune", "Herbert").unwrap().id(), 121);
    assert_eq!(
        books_file(&tmp),
        "120;Emma;Austen;Available\n121;Dune;Herbert;Available\n"
    );
}

#[test]
fn configured_files_and_seed_are_used() {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join(Config::FILE_NAME),
        "_version = \"1\"\nbooks_file = \"catalog.db\"\nlog_file = \"waiting.log\"\nid_seed = 9000\n",
    )
    .unwrap();

    let mut catalog = open(&tmp);
    let id = catalog.add("Dune", "Herbert").unwrap().id();
    catalog.request_borrow("carol", id).unwrap();

    assert_eq!(id, 9001);
    assert_eq!(
        fs::read_to_string(tmp.path().join("catalog.db")).unwrap(),
        "9001;Dune;Herbert;Available\n"
    );
    assert!(tmp.path().join("waiting.log").exists());
    assert!(!tmp.path().join("books.txt").exists());
}

#[test]
fn failed_flush_keeps_the_change_in_memory() {
    let tmp = TempDir::new().unwrap();
    let config = Config::default();
    let store = FlatFileStore::new(
        tmp.path().join("no-such-dir").join("books.txt"),
        tmp.path().join("users.txt"),
    );
    let mut catalog = Catalog::open(store, &config).unwrap();

    let err = catalog.add("Dune", "Herbert").unwrap_err();

    assert!(matches!(err, CatalogError::Persistence(_)));
    assert_eq!(catalog.stats().records, 1);
    assert!(catalog.find_by_title("dune").is_some());
}

#[test]
fn failed_log_write_keeps_the_request_queued() {
    let tmp = TempDir::new().unwrap();
    let store = FlatFileStore::new(
        tmp.path().join("books.txt"),
        tmp.path().join("no-such-dir").join("users.txt"),
    );
    let mut catalog = Catalog::open(store, &Config::default()).unwrap();
    let id = catalog.add("Dune", "Herbert").unwrap().id();

    let err = catalog.request_borrow("alice", id).unwrap_err();

    assert!(matches!(err, CatalogError::Persistence(_)));
    assert_eq!(catalog.stats().pending_requests, 1);
    let request = catalog.process_next_request().unwrap();
    assert_eq!((request.user.as_str(), request.book_id), ("alice", id));
}
