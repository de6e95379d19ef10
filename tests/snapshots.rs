//! Snapshot tests: persisted layout and rendered shelf output regression detection.

mod common;

use common::TestShelf;
use insta::{assert_json_snapshot, assert_snapshot};

use bookshelf_mcp::application::storage::{StorageAdapter, STORAGE_KEY};
use bookshelf_mcp::infra::memory_store::MemoryStore;
use bookshelf_mcp::interface::render::{format_matches, format_shelves};

// =============================================================================
// Persisted layout
// =============================================================================

#[test]
fn snapshot_persisted_layout() {
    let ts = TestShelf::standard();
    let raw = ts.shelf.storage().store().raw(STORAGE_KEY).unwrap();
    assert_snapshot!(raw, @r#"[{"id":1,"title":"Dune","author":"Herbert","year":1965,"isComplete":false},{"id":2,"title":"Foundation","author":"Asimov","year":1951,"isComplete":true},{"id":3,"title":"Emma","author":"Austen","year":1815,"isComplete":false}]"#);
}

#[test]
fn snapshot_legacy_record_normalized() {
    let raw = r#"[{"id":"42","title":"Dune","author":"Herbert","year":"1965"}]"#;
    let adapter = StorageAdapter::new(MemoryStore::with_entry(STORAGE_KEY, raw));
    let books = adapter.load().unwrap().unwrap();

    assert_json_snapshot!(books[0], @r#"
    {
      "id": 42,
      "title": "Dune",
      "author": "Herbert",
      "year": 1965,
      "isComplete": false
    }
    "#);
}

// =============================================================================
// Rendered text
// =============================================================================

#[test]
fn snapshot_shelves() {
    let ts = TestShelf::standard();
    let out = format_shelves(&ts.shelf.shelves());
    assert_snapshot!(out.trim_end(), @r"
    ## Unfinished (2)
    - [ ] 1. Dune by Herbert (1965)
    - [ ] 3. Emma by Austen (1815)

    ## Finished (1)
    - [x] 2. Foundation by Asimov (1951)
    ");
}

#[test]
fn snapshot_empty_finished_shelf() {
    let mut ts = TestShelf::standard();
    ts.shelf.toggle_completion(ts.ids["foundation"]).unwrap();
    let out = format_shelves(&ts.shelf.shelves());
    assert_snapshot!(out.trim_end(), @r"
    ## Unfinished (3)
    - [ ] 1. Dune by Herbert (1965)
    - [ ] 2. Foundation by Asimov (1951)
    - [ ] 3. Emma by Austen (1815)

    ## Finished (0)
    (empty)
    ");
}

#[test]
fn snapshot_search_matches() {
    let ts = TestShelf::standard();
    let hits = ts.shelf.search("dun");
    let out = format_matches("dun", &hits);
    assert_snapshot!(out.trim_end(), @r"
    1 book(s) matching 'dun':
    - [ ] 1. Dune by Herbert (1965)
    ");
}
