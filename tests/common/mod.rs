//! Shared test harness for integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use bookshelf_mcp::application::notify::ShelfEvent;
use bookshelf_mcp::application::shelf::Bookshelf;
use bookshelf_mcp::application::storage::STORAGE_KEY;
use bookshelf_mcp::domain::model::book::{Book, BookDraft};
use bookshelf_mcp::domain::model::id::{BookId, IdGenerator};
use bookshelf_mcp::domain::repository::KeyValueStore;
use bookshelf_mcp::infra::memory_store::MemoryStore;

// =============================================================================
// SequenceIds: 決定的なID採番器
// =============================================================================

/// 1クロック刻みずつ進む時計を模した採番器。
pub struct SequenceIds {
    next: i64,
}

impl SequenceIds {
    pub fn starting_at(next: i64) -> Self {
        Self { next }
    }
}

impl IdGenerator for SequenceIds {
    fn next_id(&mut self) -> BookId {
        let id = BookId::new(self.next);
        self.next += 1;
        id
    }
}

/// 決定的IDのインメモリ本棚。
pub fn memory_shelf() -> Bookshelf<MemoryStore> {
    Bookshelf::with_id_generator(MemoryStore::new(), SequenceIds::starting_at(1))
}

// =============================================================================
// EventLog: 受信した通知の記録
// =============================================================================

pub type EventLog = Arc<Mutex<Vec<ShelfEvent>>>;

pub fn record_events<S: KeyValueStore>(shelf: &mut Bookshelf<S>) -> EventLog {
    let log: EventLog = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&log);
    shelf.subscribe(move |event: ShelfEvent, _: &[Book]| sink.lock().unwrap().push(event));
    log
}

pub fn events(log: &EventLog) -> Vec<ShelfEvent> {
    log.lock().unwrap().clone()
}

// =============================================================================
// TestShelf: 構造化済みテスト用本棚
// =============================================================================

/// テスト用の本棚。IDを名前で引ける。
pub struct TestShelf {
    pub shelf: Bookshelf<MemoryStore>,
    pub ids: HashMap<&'static str, BookId>,
}

impl TestShelf {
    /// 標準的なテスト用本棚:
    /// ```text
    /// 1. Dune (Herbert, 1965) unfinished
    /// 2. Foundation (Asimov, 1951) finished
    /// 3. Emma (Austen, 1815) unfinished
    /// ```
    pub fn standard() -> Self {
        let mut shelf = memory_shelf();
        let mut ids = HashMap::new();
        ids.insert("dune", shelf.add(BookDraft::new("Dune", "Herbert", 1965, false)));
        ids.insert(
            "foundation",
            shelf.add(BookDraft::new("Foundation", "Asimov", 1951, true)),
        );
        ids.insert("emma", shelf.add(BookDraft::new("Emma", "Austen", 1815, false)));
        Self { shelf, ids }
    }
}

// =============================================================================
// Assertion helpers
// =============================================================================

/// 永続化されたJSONをパースして返す。未保存ならNone。
pub fn stored_json(shelf: &Bookshelf<MemoryStore>) -> Option<serde_json::Value> {
    shelf
        .storage()
        .store()
        .raw(STORAGE_KEY)
        .map(|raw| serde_json::from_str(&raw).unwrap())
}

/// 結果がErrで、メッセージに指定文字列を含むことをassert。
pub fn assert_error_contains<T: std::fmt::Debug>(
    result: Result<T, impl std::fmt::Display>,
    expected: &str,
) {
    match result {
        Err(e) => {
            let msg = e.to_string();
            assert!(
                msg.contains(expected),
                "Expected error containing '{expected}', got: '{msg}'"
            );
        }
        Ok(v) => panic!("Expected error containing '{expected}', got Ok({v:?})"),
    }
}
